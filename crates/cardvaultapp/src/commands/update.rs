use super::helpers::{require, snapshot_or_rollback, Rollback};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{CardForm, CardId, PendingCard};
use crate::store::DataStore;

/// Merges the fields present in `form` over the stored card. The id and
/// `createdAt` are kept; `updatedAt` moves forward.
pub fn run<S: DataStore>(store: &mut S, id: &CardId, form: &CardForm) -> Result<CmdResult> {
    let existing = require(store, id)?;

    let mut fields = existing.fields.clone();
    fields.apply_form(form);
    let record = store.put(PendingCard {
        id: Some(existing.id.clone()),
        created_at: Some(existing.created_at),
        fields,
    })?;
    snapshot_or_rollback(store, Rollback::Restore(vec![existing]))?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Card updated: {}",
        record.fields.name
    )));
    result.affected_cards.push(record);
    Ok(result)
}
