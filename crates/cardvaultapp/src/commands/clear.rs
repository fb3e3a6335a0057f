use super::helpers::{snapshot_or_rollback, Rollback};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::DataStore;

/// Removes every card and empties the mirror.
pub fn run<S: DataStore>(store: &mut S) -> Result<CmdResult> {
    let previous = store.get_all()?;
    store.clear()?;
    let removed = previous.len();
    snapshot_or_rollback(store, Rollback::Restore(previous))?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Removed {} card(s) from the collection",
        removed
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::{BackupMirror, RecordStore};

    #[test]
    fn clears_store_and_mirror() {
        let mut store = StoreFixture::new().with_cards(3).store;
        let result = run(&mut store).unwrap();

        assert_eq!(store.count().unwrap(), 0);
        assert!(store.read_snapshot().unwrap().is_empty());
        assert!(result.messages[0].content.contains('3'));
    }

    #[test]
    fn failed_snapshot_restores_everything() {
        let mut store = StoreFixture::new().with_cards(2).store;
        store.backend().set_simulate_snapshot_error(true);

        assert!(run(&mut store).is_err());
        assert_eq!(store.count().unwrap(), 2);
    }
}
