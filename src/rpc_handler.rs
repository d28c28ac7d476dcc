//! Message handler for the tab sidebar protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! A message is a JSON object tagged by `type` (`{"type": "MOVE_TAB", ...}`);
//! the reply is `{"success": true, ...}` or `{"success": false, "error": ...}`.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::app::App;
use crate::host::TabHost;
use crate::types::command::{Command, CommandOutcome};
use crate::types::errors::CommandError;

/// Decodes a message into a `Command`.
pub fn decode_command(message: &Value) -> Result<Command, CommandError> {
    Command::deserialize(message).map_err(|e| CommandError::InvalidRequest(e.to_string()))
}

/// Decodes, dispatches and encodes one message.
pub async fn handle_message<H: TabHost>(app: &mut App<H>, message: &Value) -> Value {
    let command = match decode_command(message) {
        Ok(command) => command,
        Err(e) => return error_response(&e),
    };
    match app.dispatch(command).await {
        Ok(outcome) => success_response(outcome),
        Err(e) => error_response(&e),
    }
}

/// Handles one raw protocol line.
pub async fn handle_line<H: TabHost>(app: &mut App<H>, line: &str) -> Value {
    match serde_json::from_str::<Value>(line) {
        Ok(message) => handle_message(app, &message).await,
        Err(e) => error_response(&CommandError::InvalidRequest(format!("parse error: {}", e))),
    }
}

/// `{"success": true}` plus the outcome's payload fields.
pub fn success_response(outcome: CommandOutcome) -> Value {
    let mut body = Map::new();
    body.insert("success".to_string(), Value::Bool(true));
    match outcome {
        CommandOutcome::Done => {}
        CommandOutcome::Snapshot(snapshot) => match serde_json::to_value(snapshot) {
            Ok(Value::Object(fields)) => body.extend(fields),
            Ok(_) => {}
            Err(e) => return json!({"success": false, "error": format!("failed to encode snapshot: {}", e)}),
        },
        CommandOutcome::Switched(tab_id) => {
            body.insert("tabId".to_string(), json!(tab_id));
        }
        CommandOutcome::GroupCreated(group_id) => {
            body.insert("groupId".to_string(), json!(group_id));
        }
    }
    Value::Object(body)
}

pub fn error_response(err: &CommandError) -> Value {
    json!({"success": false, "error": err.to_string()})
}
