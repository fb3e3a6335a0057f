use super::backend::StorageBackend;
use super::{BackupMirror, DataStore, RecordStore};
use crate::error::{CardError, Result};
use crate::model::{CardId, CardRecord, PendingCard};
use chrono::{Duration, Utc};
use serde_json::Value;
use tracing::{debug, warn};

pub struct CardStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
}

impl<B: StorageBackend> CardStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: StorageBackend> RecordStore for CardStore<B> {
    fn put(&mut self, card: PendingCard) -> Result<CardRecord> {
        let id = card
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(CardId::generate);
        let now = Utc::now();
        let created_at = card.created_at.unwrap_or(now);

        // updated_at never precedes created_at and always moves forward for an id
        let mut updated_at = now.max(created_at);
        let previous = match self.backend.load_record(&id) {
            Ok(previous) => previous,
            // An unreadable previous version is simply replaced.
            Err(CardError::Serialization(e)) => {
                warn!(id = %id, error = %e, "overwriting unreadable card record");
                None
            }
            Err(e) => return Err(e),
        };
        if let Some(previous) = previous {
            if updated_at <= previous.updated_at {
                updated_at = previous.updated_at + Duration::microseconds(1);
            }
        }

        let mut fields = card.fields;
        fields.normalize();

        let record = CardRecord {
            id,
            created_at,
            updated_at,
            fields,
        };
        self.backend.save_record(&record)?;
        debug!(id = %record.id, name = %record.fields.name, "card stored");
        Ok(record)
    }

    fn get(&self, id: &CardId) -> Result<Option<CardRecord>> {
        self.backend.load_record(id)
    }

    fn get_all(&self) -> Result<Vec<CardRecord>> {
        self.backend.load_all_records()
    }

    fn delete(&mut self, id: &CardId) -> Result<()> {
        if self.backend.remove_record(id)? {
            debug!(id = %id, "card removed");
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.backend.clear_records()
    }

    fn restore_exact(&mut self, record: &CardRecord) -> Result<()> {
        self.backend.save_record(record)
    }
}

impl<B: StorageBackend> BackupMirror for CardStore<B> {
    fn write_snapshot(&mut self, cards: &[CardRecord]) -> Result<()> {
        let text = serde_json::to_string(cards).map_err(CardError::Serialization)?;
        self.backend.save_snapshot(&text)?;
        debug!(count = cards.len(), "mirror snapshot written");
        Ok(())
    }

    fn read_snapshot(&self) -> Result<Vec<CardRecord>> {
        let text = match self.backend.load_snapshot()? {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Ok(Vec::new()),
        };

        // A snapshot that is not a list at all is a storage failure. Individual
        // entries that cannot be read are skipped so the rest stay recoverable.
        let entries: Vec<Value> = serde_json::from_str(&text).map_err(CardError::Serialization)?;
        let mut cards = Vec::with_capacity(entries.len());
        for (position, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<CardRecord>(entry) {
                Ok(card) => cards.push(card),
                Err(e) => warn!(position, error = %e, "skipping unreadable mirror entry"),
            }
        }
        Ok(cards)
    }
}

impl<B: StorageBackend> DataStore for CardStore<B> {
    fn available(&self) -> bool {
        self.backend.available()
    }

    fn location(&self) -> String {
        self.backend.location()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CardForm, DEFAULT_HP};
    use crate::store::mem_backend::MemBackend;

    fn make_store() -> CardStore<MemBackend> {
        CardStore::with_backend(MemBackend::new())
    }

    fn pending(name: &str) -> PendingCard {
        PendingCard::from_form(CardForm::named(name))
    }

    // --- Put Tests ---

    #[test]
    fn put_assigns_id_and_timestamps() {
        let mut store = make_store();
        let record = store.put(pending("Sparky")).unwrap();

        assert!(!record.id.is_empty());
        assert!(record.updated_at >= record.created_at);
        assert_eq!(record.fields.hp, DEFAULT_HP);
    }

    #[test]
    fn put_keeps_given_id_and_created_at() {
        let mut store = make_store();
        let first = store.put(pending("Sparky")).unwrap();

        let mut again = PendingCard::from(first.clone());
        again.fields.name = "Sparky II".to_string();
        let second = store.put(again).unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at > first.updated_at);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn put_treats_blank_id_as_absent() {
        let mut store = make_store();
        let mut card = pending("Blank");
        card.id = Some(CardId::from(""));
        let record = store.put(card).unwrap();
        assert!(!record.id.is_empty());
    }

    #[test]
    fn put_normalizes_duplicate_types() {
        let mut store = make_store();
        let mut card = pending("Blaze");
        card.fields.type1 = "Fire".into();
        card.fields.type2 = Some("Fire".into());
        let record = store.put(card).unwrap();
        assert_eq!(record.fields.type2, None);
    }

    #[test]
    fn put_fails_on_write_error() {
        let backend = MemBackend::new();
        backend.set_simulate_write_error(true);
        let mut store = CardStore::with_backend(backend);
        assert!(store.put(pending("Nope")).is_err());
    }

    // --- Get / Delete Tests ---

    #[test]
    fn get_missing_is_none() {
        let store = make_store();
        assert!(store.get(&CardId::from("missing")).unwrap().is_none());
    }

    #[test]
    fn delete_missing_is_noop() {
        let mut store = make_store();
        store.delete(&CardId::from("missing")).unwrap();
    }

    #[test]
    fn delete_removes_record() {
        let mut store = make_store();
        let record = store.put(pending("Gone")).unwrap();
        store.delete(&record.id).unwrap();
        assert!(store.get(&record.id).unwrap().is_none());
    }

    // --- Lookup Tests ---

    #[test]
    fn find_by_name_is_case_insensitive_substring() {
        let mut store = make_store();
        store.put(pending("Thunder Mouse")).unwrap();
        store.put(pending("Rock Crab")).unwrap();

        let found = store.find_by_name("MOUSE").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].fields.name, "Thunder Mouse");
    }

    #[test]
    fn find_by_author_and_type_are_exact() {
        let mut store = make_store();
        store
            .put(PendingCard::from_form(
                CardForm::named("A")
                    .with_author("Ash")
                    .with_types("Water", Some("Ice")),
            ))
            .unwrap();
        store
            .put(PendingCard::from_form(
                CardForm::named("B").with_author("ash").with_types("Ice", None),
            ))
            .unwrap();

        assert_eq!(store.find_by_author("Ash").unwrap().len(), 1);
        assert_eq!(store.find_by_type("Ice").unwrap().len(), 2);
        assert_eq!(store.find_by_type("Water").unwrap().len(), 1);
        assert!(store.find_by_type("ice").unwrap().is_empty());
    }

    // --- Mirror Tests ---

    #[test]
    fn empty_mirror_reads_as_empty_list() {
        let store = make_store();
        assert!(store.read_snapshot().unwrap().is_empty());

        store.backend.seed_snapshot("   ");
        assert!(store.read_snapshot().unwrap().is_empty());
    }

    #[test]
    fn snapshot_round_trip() {
        let mut store = make_store();
        let a = store.put(pending("A")).unwrap();
        let b = store.put(pending("B")).unwrap();
        store.write_snapshot(&[a.clone(), b.clone()]).unwrap();

        let snapshot = store.read_snapshot().unwrap();
        assert_eq!(snapshot, vec![a, b]);
    }

    #[test]
    fn snapshot_skips_unreadable_entries() {
        let store = make_store();
        store.backend.seed_snapshot(
            r#"[{"id":"ok1","createdAt":"2024-01-01T00:00:00Z","name":"Fine"},
                {"name":"no id"},
                42]"#,
        );
        let snapshot = store.read_snapshot().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id.as_str(), "ok1");
    }

    #[test]
    fn snapshot_that_is_not_a_list_is_an_error() {
        let store = make_store();
        store.backend.seed_snapshot(r#"{"cards": []}"#);
        assert!(matches!(
            store.read_snapshot(),
            Err(CardError::Serialization(_))
        ));
    }

    #[test]
    fn failed_snapshot_keeps_previous_one() {
        let mut store = make_store();
        let a = store.put(pending("A")).unwrap();
        store.write_snapshot(std::slice::from_ref(&a)).unwrap();

        store.backend.set_simulate_snapshot_error(true);
        assert!(store.write_snapshot(&[]).is_err());
        assert_eq!(store.read_snapshot().unwrap(), vec![a]);
    }
}
