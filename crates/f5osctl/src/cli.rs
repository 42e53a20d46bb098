//! Clap derive structures for the `f5osctl` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// f5osctl -- drive F5OS rSeries and Velos systems over RESTCONF
#[derive(Debug, Parser)]
#[command(
    name = "f5osctl",
    version,
    about = "Manage F5OS rSeries appliances and Velos systems from the command line",
    long_about = "Talks to the F5OS RESTCONF API with token authentication.\n\n\
        The platform (rSeries, Velos partition or Velos controller) is\n\
        detected automatically at login.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device profile to use
    #[arg(long, short = 'p', env = "F5OS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Management host, address or URL (overrides profile)
    #[arg(long, short = 'H', env = "F5OS_HOST", global = true)]
    pub host: Option<String>,

    /// Port used when the host carries none
    #[arg(long, env = "F5OS_PORT", global = true)]
    pub port: Option<u16>,

    /// Login username
    #[arg(long, short = 'u', env = "F5OS_USERNAME", global = true)]
    pub username: Option<String>,

    /// Login password
    #[arg(long, env = "F5OS_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "F5OS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Increase verbosity (-v, -vv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and report the detected platform
    Platform,

    /// Read a RESTCONF data path
    Get(GetArgs),

    /// Inspect and update interfaces
    #[command(alias = "if")]
    Interface(InterfaceArgs),

    /// Send a prepared multipart body to an upload endpoint
    Upload(UploadArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Path below /restconf/data, e.g. /openconfig-vlan:vlans
    pub path: String,
}

// ── Interfaces ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InterfaceArgs {
    #[command(subcommand)]
    pub command: InterfaceCommand,
}

#[derive(Debug, Subcommand)]
pub enum InterfaceCommand {
    /// Show one interface
    Show {
        /// Interface name, e.g. 1.0 or 1/1.0
        name: String,
    },

    /// Set the switched-VLAN membership of an interface
    ///
    /// VLANs configured on the device but absent here are removed first.
    Vlans {
        /// Interface name, e.g. 1.0 or 1/1.0
        name: String,

        /// Native (untagged) VLAN
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..=4094))]
        native: Option<u16>,

        /// Tagged VLANs (comma-separated)
        #[arg(
            long,
            value_delimiter = ',',
            value_parser = clap::value_parser!(u16).range(1..=4094)
        )]
        trunk: Vec<u16>,
    },
}

// ── Upload ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// File holding the prepared request body
    pub file: PathBuf,

    /// Upload endpoint below /restconf/data
    #[arg(long)]
    pub path: String,

    /// Value of the File-Upload-Id header
    #[arg(long)]
    pub upload_id: String,

    /// Content type, including the multipart boundary
    #[arg(long)]
    pub content_type: String,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
