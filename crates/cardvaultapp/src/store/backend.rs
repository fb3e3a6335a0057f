use crate::error::Result;
use crate::model::{CardId, CardRecord};

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while CardStore handles the "what" (id assignment, timestamps, snapshots).
///
/// Backends never interpret failures: whatever the substrate reports is
/// returned as-is and classified further up.
pub trait StorageBackend {
    // --- Record Operations ---

    /// Read one record. Returns Ok(None) if the key does not exist.
    fn load_record(&self, id: &CardId) -> Result<Option<CardRecord>>;

    /// Write one record under its id.
    /// MUST be atomic per key (e.g. write to tmp then rename).
    fn save_record(&self, record: &CardRecord) -> Result<()>;

    /// Remove one record. Returns whether anything was removed.
    fn remove_record(&self, id: &CardId) -> Result<bool>;

    /// Read every stored record, in no particular order.
    fn load_all_records(&self) -> Result<Vec<CardRecord>>;

    /// Remove every stored record.
    fn clear_records(&self) -> Result<()>;

    // --- Snapshot Slot ---

    /// Read the raw snapshot slot. Returns Ok(None) if it was never written.
    fn load_snapshot(&self) -> Result<Option<String>>;

    /// Replace the raw snapshot slot.
    /// MUST be atomic: either the new text replaces the old one or the old one remains.
    fn save_snapshot(&self, text: &str) -> Result<()>;

    // --- Capabilities ---

    /// Check that the substrate can be used at all (directory reachable, etc.).
    fn available(&self) -> bool;

    /// Human readable location of the data (a path, or a virtual URI).
    fn location(&self) -> String;
}
