//! Handler for `fleetward setup`.

use serde_json::json;

use super::command::SetupArgs;
use super::output;
use crate::error::Result;
use crate::port::inbound::{Caller, FleetOperations, SetupRequest};

/// Execute `setup`. Without `--key-file` this only reports readiness.
pub async fn execute(ops: &dyn FleetOperations, caller: &Caller, args: &SetupArgs) -> Result<()> {
    let request = match &args.key_file {
        Some(path) => SetupRequest::with_key_file(tokio::fs::read_to_string(path).await?),
        None => SetupRequest::probe(),
    };

    ops.setup(caller, request).await?;

    if output::is_json() {
        output::json_output(json!({ "command": "setup", "done": true }));
        return Ok(());
    }
    output::success("Setup complete");
    Ok(())
}
