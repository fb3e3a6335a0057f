use super::backend::StorageBackend;
use crate::error::{CardError, Result};
use crate::model::{CardId, CardRecord};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since a session is single-threaded.
/// This avoids the overhead of `RwLock` while still allowing the
/// `StorageBackend` trait to use `&self` for all methods.
///
/// Failure injection covers the cases the collection manager has to survive:
/// record writes failing, snapshot writes failing, a snapshot quota, and a
/// substrate that is unavailable altogether.
#[derive(Default)]
pub struct MemBackend {
    records: RefCell<HashMap<CardId, CardRecord>>,
    snapshot: RefCell<Option<String>>,
    simulate_write_error: Cell<bool>,
    simulate_snapshot_error: Cell<bool>,
    simulate_unavailable: Cell<bool>,
    snapshot_quota: Cell<Option<usize>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable record write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Make snapshot writes fail while record writes keep working.
    pub fn set_simulate_snapshot_error(&self, simulate: bool) {
        self.simulate_snapshot_error.set(simulate);
    }

    /// Make every operation fail as if the substrate could not be opened.
    pub fn set_simulate_unavailable(&self, simulate: bool) {
        self.simulate_unavailable.set(simulate);
    }

    /// Reject snapshots larger than `bytes`, like a browser storage quota.
    pub fn set_snapshot_quota(&self, bytes: Option<usize>) {
        self.snapshot_quota.set(bytes);
    }

    /// Test helper: put raw text into the snapshot slot, bypassing the mirror.
    pub fn seed_snapshot(&self, text: &str) {
        *self.snapshot.borrow_mut() = Some(text.to_string());
    }

    /// Test helper: the raw snapshot text, if any.
    pub fn raw_snapshot(&self) -> Option<String> {
        self.snapshot.borrow().clone()
    }

    /// Test helper: drop every record without touching the snapshot,
    /// simulating a wiped primary store.
    pub fn wipe_records(&self) {
        self.records.borrow_mut().clear();
    }

    fn check_available(&self) -> Result<()> {
        if self.simulate_unavailable.get() {
            return Err(CardError::Store("Simulated unavailable backend".to_string()));
        }
        Ok(())
    }

    fn check_writable(&self) -> Result<()> {
        self.check_available()?;
        if self.simulate_write_error.get() {
            return Err(CardError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn load_record(&self, id: &CardId) -> Result<Option<CardRecord>> {
        self.check_available()?;
        Ok(self.records.borrow().get(id).cloned())
    }

    fn save_record(&self, record: &CardRecord) -> Result<()> {
        self.check_writable()?;
        self.records
            .borrow_mut()
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn remove_record(&self, id: &CardId) -> Result<bool> {
        self.check_writable()?;
        Ok(self.records.borrow_mut().remove(id).is_some())
    }

    fn load_all_records(&self) -> Result<Vec<CardRecord>> {
        self.check_available()?;
        Ok(self.records.borrow().values().cloned().collect())
    }

    fn clear_records(&self) -> Result<()> {
        self.check_writable()?;
        self.records.borrow_mut().clear();
        Ok(())
    }

    fn load_snapshot(&self) -> Result<Option<String>> {
        self.check_available()?;
        Ok(self.snapshot.borrow().clone())
    }

    fn save_snapshot(&self, text: &str) -> Result<()> {
        self.check_available()?;
        if self.simulate_snapshot_error.get() {
            return Err(CardError::Store("Simulated snapshot error".to_string()));
        }
        if let Some(quota) = self.snapshot_quota.get() {
            if text.len() > quota {
                return Err(CardError::Io(io::Error::new(
                    io::ErrorKind::StorageFull,
                    format!("snapshot of {} bytes exceeds quota of {}", text.len(), quota),
                )));
            }
        }
        *self.snapshot.borrow_mut() = Some(text.to_string());
        Ok(())
    }

    fn available(&self) -> bool {
        !self.simulate_unavailable.get()
    }

    fn location(&self) -> String {
        "memory://cards".to_string()
    }
}
