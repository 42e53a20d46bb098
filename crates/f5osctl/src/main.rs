mod cli;
mod commands;
mod config;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Level from `TF_LOG_PROVIDER_F5OS` / `TF_LOG`, raised by `-v` flags.
/// `RUST_LOG` replaces both when set.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => f5os_config::log_level_from_env(),
        1 => LevelFilter::DEBUG.max(f5os_config::log_level_from_env()),
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "f5osctl", &mut std::io::stdout());
            Ok(())
        }

        // Everything else needs a logged-in session
        cmd => {
            let session_config = config::build_session_config(&cli.global)?;
            tracing::debug!(command = ?cmd, host = %session_config.host, "dispatching command");
            commands::dispatch(cmd, &session_config).await
        }
    }
}
