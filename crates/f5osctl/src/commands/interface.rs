use f5os_api::{InterfacesRequest, Session};

use crate::cli::{InterfaceArgs, InterfaceCommand};
use crate::error::CliError;

use super::util;

pub async fn handle(
    session: &Session,
    args: InterfaceArgs,
    on_err: &impl Fn(f5os_api::Error) -> CliError,
) -> Result<(), CliError> {
    match args.command {
        InterfaceCommand::Show { name } => {
            let resp = session.get_interface(&name).await.map_err(on_err)?;
            if resp.interface.is_empty() {
                return Err(CliError::NotFound {
                    resource_type: "Interface".into(),
                    identifier: name,
                });
            }
            util::print_json(&resp)
        }

        InterfaceCommand::Vlans {
            name,
            native,
            trunk,
        } => {
            let request = InterfacesRequest::switched_vlan(&name, native, trunk);
            let update = session
                .update_interface(&name, &request)
                .await
                .map_err(on_err)?;
            util::print_json(&update.steps)
        }
    }
}
