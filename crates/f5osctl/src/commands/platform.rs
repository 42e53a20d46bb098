use serde::Serialize;

use f5os_api::{PlatformType, Session};

use crate::error::CliError;

use super::util;

#[derive(Serialize)]
struct PlatformReport<'a> {
    host: &'a str,
    platform: Option<PlatformType>,
}

pub fn handle(session: &Session) -> Result<(), CliError> {
    util::print_json(&PlatformReport {
        host: session.base_url().as_str(),
        platform: session.platform(),
    })
}
