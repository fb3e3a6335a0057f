use super::helpers::{require, snapshot_or_rollback, Rollback};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::CardId;
use crate::store::DataStore;

pub fn run<S: DataStore>(store: &mut S, id: &CardId) -> Result<CmdResult> {
    let existing = require(store, id)?;
    store.delete(id)?;
    snapshot_or_rollback(store, Rollback::Restore(vec![existing.clone()]))?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Card deleted: {}",
        existing.fields.name
    )));
    result.affected_cards.push(existing);
    Ok(result)
}
