use super::helpers::{snapshot_or_rollback, Rollback};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CardError, Result};
use crate::model::PendingCard;
use crate::store::DataStore;
use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

/// Parses import text. Anything that is not JSON is an invalid document.
pub fn parse_document(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| CardError::InvalidFormat(e.to_string()))
}

/// Stores every card of an export document under a fresh id, stamped with the
/// import time. The document shape is checked before anything is written.
/// Elements that cannot be read, stored or mirrored are skipped, and the
/// cards imported before them stay imported.
pub fn run<S: DataStore>(store: &mut S, document: &Value) -> Result<CmdResult> {
    let object = document
        .as_object()
        .ok_or_else(|| CardError::InvalidFormat("expected a JSON object".to_string()))?;
    let cards = object
        .get("cards")
        .and_then(Value::as_array)
        .ok_or_else(|| CardError::InvalidFormat("missing `cards` list".to_string()))?;

    let imported_at = Utc::now();
    let mut imported = Vec::new();
    let mut skipped = 0usize;

    for (position, element) in cards.iter().enumerate() {
        if !element.is_object() {
            warn!(position, "skipping import entry that is not a card object");
            skipped += 1;
            continue;
        }
        let pending = match serde_json::from_value::<PendingCard>(element.clone()) {
            Ok(pending) => pending.rekeyed(imported_at),
            Err(e) => {
                warn!(position, error = %e, "skipping unreadable import entry");
                skipped += 1;
                continue;
            }
        };
        let record = match store.put(pending) {
            Ok(record) => record,
            Err(e) => {
                warn!(position, error = %e, "could not store import entry");
                skipped += 1;
                continue;
            }
        };
        // Each card is saved like a single save: store write, then mirror.
        match snapshot_or_rollback(store, Rollback::Remove(vec![record.id.clone()])) {
            Ok(()) => imported.push(record),
            Err(e) => {
                warn!(position, error = %e, "could not mirror import entry");
                skipped += 1;
            }
        }
    }
    info!(imported = imported.len(), skipped, "import finished");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Imported {} card(s)",
        imported.len()
    )));
    if skipped > 0 {
        result.add_message(CmdMessage::warning(format!(
            "Skipped {} entr{} that could not be imported",
            skipped,
            if skipped == 1 { "y" } else { "ies" }
        )));
    }
    Ok(result.with_affected_cards(imported))
}
