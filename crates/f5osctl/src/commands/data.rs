use f5os_api::Session;

use crate::cli::GetArgs;
use crate::error::CliError;

use super::util;

pub async fn handle(
    session: &Session,
    args: GetArgs,
    on_err: &impl Fn(f5os_api::Error) -> CliError,
) -> Result<(), CliError> {
    let resp = session.get(&args.path).await.map_err(on_err)?;
    if resp.is_not_found() {
        return Err(CliError::NotFound {
            resource_type: "Path".into(),
            identifier: args.path,
        });
    }
    util::print_body(resp.body())
}
