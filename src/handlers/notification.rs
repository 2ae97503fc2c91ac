use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    AppState,
    models::whatsapp::{InboundMessage, WHATSAPP_BUSINESS_ACCOUNT},
};

/// A notification node that is missing or has the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("missing key `{0}`")]
    MissingKey(String),
    #[error("`{0}` is empty")]
    Empty(String),
    #[error("`{path}` is not {expected}")]
    WrongType { path: String, expected: &'static str },
}

/// Walks every entry/change in document order. Changes without `value.messages`
/// produce nothing; every other change yields one outcome.
pub fn extract_messages(payload: &Value) -> Vec<Result<InboundMessage, StructureError>> {
    let entries = match array(payload, "entry", "") {
        Ok(entries) => entries,
        Err(err) => return vec![Err(err)],
    };

    let mut out = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        let entry_path = format!("entry[{i}]");
        let changes = match array(entry, "changes", &entry_path) {
            Ok(changes) => changes,
            Err(err) => {
                out.push(Err(err));
                continue;
            }
        };

        for (j, change) in changes.iter().enumerate() {
            let change_path = format!("{entry_path}.changes[{j}]");
            if let Some(outcome) = extract_from_change(change, &change_path) {
                out.push(outcome);
            }
        }
    }
    out
}

fn extract_from_change(
    change: &Value,
    path: &str,
) -> Option<Result<InboundMessage, StructureError>> {
    let value_path = format!("{path}.value");
    let value = match field(change, "value", path) {
        Ok(value) => value,
        Err(err) => return Some(Err(err)),
    };
    // Status updates and other non-message changes carry no `messages`.
    value.get("messages")?;

    Some(first_message(value, &value_path))
}

fn first_message(value: &Value, path: &str) -> Result<InboundMessage, StructureError> {
    let messages_path = format!("{path}.messages");
    let message = array(value, "messages", path)?
        .first()
        .ok_or_else(|| StructureError::Empty(messages_path.clone()))?;

    let message_path = format!("{messages_path}[0]");
    let sender_id = string(field(message, "from", &message_path)?, &format!("{message_path}.from"))?;
    let text = field(message, "text", &message_path)?;
    let text_path = format!("{message_path}.text");
    let message_text = string(field(text, "body", &text_path)?, &format!("{text_path}.body"))?;

    Ok(InboundMessage {
        sender_id: sender_id.to_string(),
        message_text: message_text.to_string(),
    })
}

/* --------------------------- traversal helpers --------------------------- */

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn field<'a>(node: &'a Value, key: &str, parent: &str) -> Result<&'a Value, StructureError> {
    node.get(key)
        .ok_or_else(|| StructureError::MissingKey(join(parent, key)))
}

fn array<'a>(node: &'a Value, key: &str, parent: &str) -> Result<&'a Vec<Value>, StructureError> {
    field(node, key, parent)?
        .as_array()
        .ok_or_else(|| StructureError::WrongType {
            path: join(parent, key),
            expected: "an array",
        })
}

fn string<'a>(node: &'a Value, path: &str) -> Result<&'a str, StructureError> {
    node.as_str().ok_or_else(|| StructureError::WrongType {
        path: path.to_string(),
        expected: "a string",
    })
}

/* --------------------------- dispatch --------------------------- */

/// Processes one POST body. Every failure ends here as a log line; the caller
/// always acknowledges the delivery.
pub async fn dispatch_notification(state: &AppState, body: &[u8]) {
    let payload: Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(err) => {
            info!("Received webhook data:\n{}", String::from_utf8_lossy(body));
            warn!("Ignoring webhook with malformed JSON: {}", err);
            return;
        }
    };

    info!(
        "Received webhook data:\n{}",
        serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
    );

    match payload.get("object").and_then(Value::as_str) {
        Some(WHATSAPP_BUSINESS_ACCOUNT) => {}
        other => {
            debug!("Skipping notification for object {:?}", other);
            return;
        }
    }

    for outcome in extract_messages(&payload) {
        let msg = match outcome {
            Ok(msg) => msg,
            Err(err) => {
                warn!("Could not parse message data: {}", err);
                continue;
            }
        };

        info!("New message from {}: '{}'", msg.sender_id, msg.message_text);

        // Store failures are logged and dropped so the platform never retries.
        if let Err(err) = state
            .store
            .save_message(&msg.sender_id, &msg.message_text)
            .await
        {
            error!("Database error for message from {}: {}", msg.sender_id, err);
        }
    }
}
