use super::helpers::{snapshot_or_rollback, Rollback};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{CardForm, PendingCard};
use crate::store::DataStore;

/// Creates a new card from form data. Missing or blank fields get their defaults.
pub fn run<S: DataStore>(store: &mut S, form: CardForm) -> Result<CmdResult> {
    let record = store.put(PendingCard::from_form(form))?;
    snapshot_or_rollback(store, Rollback::Remove(vec![record.id.clone()]))?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Card saved: {}",
        record.fields.name
    )));
    result.affected_cards.push(record);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CardError;
    use crate::model::{DEFAULT_ATTACK, DEFAULT_HP};
    use crate::store::memory::InMemoryStore;
    use crate::store::{BackupMirror, RecordStore};
    use std::io;

    #[test]
    fn saved_card_reads_back_identically() {
        let mut store = InMemoryStore::new();
        let form = CardForm::named("Pyroclaw")
            .with_author("Mika")
            .with_types("Fire", Some("Dragon"))
            .with_stats("90", "75", "40");

        let result = run(&mut store, form).unwrap();
        let saved = result.card().unwrap().clone();

        let stored = store.get(&saved.id).unwrap().unwrap();
        assert_eq!(stored, saved);
        assert!(stored.updated_at >= stored.created_at);
        assert_eq!(stored.fields.hp, 90);
        assert!(result.messages[0].content.contains("Pyroclaw"));
    }

    #[test]
    fn save_mirrors_the_collection() {
        let mut store = InMemoryStore::new();
        run(&mut store, CardForm::named("One")).unwrap();
        run(&mut store, CardForm::named("Two")).unwrap();
        assert_eq!(store.read_snapshot().unwrap().len(), 2);
    }

    #[test]
    fn missing_stats_get_defaults() {
        let mut store = InMemoryStore::new();
        let result = run(&mut store, CardForm::named("Plain")).unwrap();
        let card = result.card().unwrap();
        assert_eq!(card.fields.hp, DEFAULT_HP);
        assert_eq!(card.fields.attack, DEFAULT_ATTACK);
    }

    #[test]
    fn zero_stat_is_kept() {
        let mut store = InMemoryStore::new();
        let result = run(&mut store, CardForm::named("Frail").with_stats("0", "0", "0")).unwrap();
        assert_eq!(result.card().unwrap().fields.hp, 0);
    }

    #[test]
    fn equal_types_store_single_type() {
        let mut store = InMemoryStore::new();
        let result =
            run(&mut store, CardForm::named("Ember").with_types("Fire", Some("Fire"))).unwrap();
        assert_eq!(result.card().unwrap().fields.type2, None);
    }

    #[test]
    fn failed_snapshot_rolls_back_the_new_card() {
        let mut store = InMemoryStore::new();
        store.backend().set_simulate_snapshot_error(true);

        assert!(run(&mut store, CardForm::named("Ghost")).is_err());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn quota_overflow_surfaces_raw_io_error() {
        let mut store = InMemoryStore::new();
        store.backend().set_snapshot_quota(Some(10));

        match run(&mut store, CardForm::named("Huge")) {
            Err(CardError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::StorageFull),
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(store.count().unwrap(), 0);
    }
}
