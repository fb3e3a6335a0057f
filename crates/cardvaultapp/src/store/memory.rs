use super::card_store::CardStore;
use super::mem_backend::MemBackend;

pub type InMemoryStore = CardStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        CardStore::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{CardForm, CardRecord, PendingCard};
    use crate::store::{BackupMirror, RecordStore};

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        /// Adds `count` cards to the store and mirrors them.
        pub fn with_cards(mut self, count: usize) -> Self {
            for i in 0..count {
                let form = CardForm::named(format!("Test Card {}", i + 1))
                    .with_author(format!("Author {}", i % 2 + 1));
                self.store.put(PendingCard::from_form(form)).unwrap();
            }
            self.sync_mirror()
        }

        pub fn with_card(mut self, form: CardForm) -> Self {
            self.store.put(PendingCard::from_form(form)).unwrap();
            self.sync_mirror()
        }

        /// Puts `records` into the mirror only, leaving the record store untouched.
        pub fn with_mirror_only(mut self, records: &[CardRecord]) -> Self {
            let mut snapshot = self.store.read_snapshot().unwrap();
            snapshot.extend_from_slice(records);
            self.store.write_snapshot(&snapshot).unwrap();
            self
        }

        fn sync_mirror(mut self) -> Self {
            let all = self.store.get_all().unwrap();
            self.store.write_snapshot(&all).unwrap();
            self
        }
    }

    /// A standalone record, never stored, for seeding mirrors.
    pub fn detached_record(id: &str, name: &str) -> CardRecord {
        let now = chrono::Utc::now();
        CardRecord {
            id: id.into(),
            created_at: now,
            updated_at: now,
            fields: PendingCard::from_form(CardForm::named(name)).fields,
        }
    }
}
