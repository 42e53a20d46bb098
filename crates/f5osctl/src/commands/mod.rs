//! Command dispatch: bridges CLI args -> session calls -> JSON output.

pub mod data;
pub mod interface;
pub mod platform;
pub mod upload;
pub mod util;

use f5os_api::{Session, SessionConfig};

use crate::cli::Command;
use crate::error::CliError;

/// Log in and dispatch a device-bound command to its handler.
pub async fn dispatch(cmd: Command, config: &SessionConfig) -> Result<(), CliError> {
    let on_err = util::api_error(config);
    let session = Session::connect(config).await.map_err(&on_err)?;

    match cmd {
        Command::Platform => platform::handle(&session),
        Command::Get(args) => data::handle(&session, args, &on_err).await,
        Command::Interface(args) => interface::handle(&session, args, &on_err).await,
        Command::Upload(args) => upload::handle(&session, args, &on_err).await,
        // Handled before a session is built
        Command::Completions(_) => Ok(()),
    }
}
