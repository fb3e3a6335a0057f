//! # Storage Layer
//!
//! This module defines the storage abstraction for cardvault. Two stores live
//! behind one interface, [`DataStore`]:
//!
//! 1. **Record Store** ([`RecordStore`]): the primary keyed store, one record per id.
//! 2. **Backup Mirror** ([`BackupMirror`]): a single flat slot holding a snapshot
//!    of the *whole* collection, rewritten after every mutation.
//!
//! The mirror has no lifecycle of its own. It is always a derived copy of the
//! record store as of the last completed mutation, and is only ever read back
//! by reconciliation (see [`crate::reconcile`]) to recover a wiped or partial store.
//!
//! ## Write Path
//!
//! ```text
//! CardApi::save ──► RecordStore::put ──► StorageBackend::save_record   (atomic per key)
//!              └──► BackupMirror::write_snapshot(all) ──► save_snapshot (atomic slot)
//! ```
//!
//! The store never retries and never classifies errors; raw failures go up to the
//! API facade.
//!
//! ## Implementations
//!
//! - [`card_store::CardStore`]: the logic (ids, timestamps, snapshot codec) over any backend.
//! - [`fs_backend::FsBackend`]: files on disk, atomic tmp + rename writes.
//! - [`mem_backend::MemBackend`]: `RefCell` maps with failure injection, for tests.
//! - [`fs::FileStore`] / [`memory::InMemoryStore`]: the two concrete store types.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── cards/card-{id}.json    # Record Store
//! ├── cards-backup.json       # Backup Mirror
//! └── cardvault.toml          # Configuration
//! ```

use crate::error::Result;
use crate::model::{CardId, CardRecord, PendingCard};

pub mod backend;
pub mod card_store;
pub mod fs;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;

/// Primary keyed store of card records.
pub trait RecordStore {
    /// Insert or overwrite by id. Assigns the id and `created_at` when absent and
    /// always refreshes `updated_at`. Returns the record as stored.
    fn put(&mut self, card: PendingCard) -> Result<CardRecord>;

    /// Get a record by id. A missing id is `Ok(None)`, never an error.
    fn get(&self, id: &CardId) -> Result<Option<CardRecord>>;

    /// All records, order unspecified.
    fn get_all(&self) -> Result<Vec<CardRecord>>;

    /// Remove a record. Deleting a missing id is a no-op.
    fn delete(&mut self, id: &CardId) -> Result<()>;

    /// Remove every record.
    fn clear(&mut self) -> Result<()>;

    /// Write a record exactly as given, timestamps included.
    /// Only used to undo a write whose mirror snapshot failed.
    fn restore_exact(&mut self, record: &CardRecord) -> Result<()>;

    fn count(&self) -> Result<usize> {
        Ok(self.get_all()?.len())
    }

    /// Case-insensitive substring match on the name.
    fn find_by_name(&self, needle: &str) -> Result<Vec<CardRecord>> {
        let needle = needle.to_lowercase();
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|c| c.fields.name.to_lowercase().contains(&needle))
            .collect())
    }

    /// Exact match on the author.
    fn find_by_author(&self, author: &str) -> Result<Vec<CardRecord>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|c| c.fields.author == author)
            .collect())
    }

    /// Exact match on either type slot.
    fn find_by_type(&self, card_type: &str) -> Result<Vec<CardRecord>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|c| c.has_type(card_type))
            .collect())
    }
}

/// Flat whole-collection snapshot used for recovery only.
pub trait BackupMirror {
    /// Replace the snapshot with `cards`. Atomic from the caller's view.
    fn write_snapshot(&mut self, cards: &[CardRecord]) -> Result<()>;

    /// The last written snapshot, or an empty list if none exists yet.
    fn read_snapshot(&self) -> Result<Vec<CardRecord>>;
}

/// The primary store and its mirror behind one interface.
pub trait DataStore: RecordStore + BackupMirror {
    /// Whether the underlying substrate can be used.
    fn available(&self) -> bool;

    /// Where the data lives, for diagnostics.
    fn location(&self) -> String;
}
