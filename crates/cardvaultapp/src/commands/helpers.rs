use crate::error::{CardError, Result};
use crate::model::{CardId, CardRecord};
use crate::store::DataStore;
use std::cmp::Ordering;
use tracing::warn;

/// How to undo a record store write when the mirror could not follow it.
#[derive(Debug)]
pub enum Rollback {
    /// The write created these ids.
    Remove(Vec<CardId>),
    /// The write replaced or removed these records.
    Restore(Vec<CardRecord>),
}

/// Loads a card or fails with `NotFound`.
pub fn require<S: DataStore>(store: &S, id: &CardId) -> Result<CardRecord> {
    store
        .get(id)?
        .ok_or_else(|| CardError::NotFound(id.clone()))
}

/// Newest `createdAt` first, ties by ascending id.
pub fn newest_first(a: &CardRecord, b: &CardRecord) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

pub fn sort_newest_first(cards: &mut [CardRecord]) {
    cards.sort_by(newest_first);
}

/// Rewrites the mirror from the full record set. If that fails, applies
/// `rollback` to the record store and returns the snapshot error.
pub fn snapshot_or_rollback<S: DataStore>(store: &mut S, rollback: Rollback) -> Result<()> {
    let snapshot = store.get_all().and_then(|all| store.write_snapshot(&all));
    let Err(err) = snapshot else {
        return Ok(());
    };

    warn!(error = %err, "mirror snapshot failed, rolling back store write");
    let undone = match &rollback {
        Rollback::Remove(ids) => ids.iter().try_for_each(|id| store.delete(id)),
        Rollback::Restore(records) => records.iter().try_for_each(|r| store.restore_exact(r)),
    };
    if let Err(e) = undone {
        warn!(error = %e, ?rollback, "rollback incomplete");
    }
    Err(err)
}
