//! Shared helpers for command handlers.

use serde::Serialize;

use f5os_api::SessionConfig;

use crate::error::CliError;

/// Error translator carrying the host and timeout of `config`.
pub fn api_error(config: &SessionConfig) -> impl Fn(f5os_api::Error) -> CliError {
    let host = config.host.clone();
    let seconds = config.timeout.as_secs();
    move |err| CliError::from_api(err, &host, seconds)
}

/// Pretty-print `value` as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a response body as pretty JSON, or verbatim when it is not JSON.
pub fn print_body(body: &[u8]) -> Result<(), CliError> {
    if body.is_empty() {
        return Ok(());
    }
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value) => print_json(&value),
        Err(_) => {
            println!("{}", String::from_utf8_lossy(body));
            Ok(())
        }
    }
}
