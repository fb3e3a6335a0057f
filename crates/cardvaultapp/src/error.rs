//! # Errors
//!
//! Storage code (the record store, the backup mirror and their backends) reports
//! failures *raw*: an [`std::io::Error`], a [`serde_json::Error`] or a backend
//! message. The API facade is the single place that turns those into the
//! user-facing kinds via [`CardError::classify`]:
//!
//! | Raw failure | Classified as |
//! |-------------|---------------|
//! | I/O `StorageFull` / `QuotaExceeded` / `FileTooLarge` | [`CardError::QuotaExceeded`] |
//! | any other I/O error | [`CardError::StorageUnavailable`] |
//! | unreadable stored JSON | [`CardError::StorageUnavailable`] |
//! | backend message | [`CardError::StorageUnavailable`] |

use crate::model::CardId;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CardError {
    #[error("Card not found: {0}")]
    NotFound(CardId),

    #[error("Invalid import document: {0}")]
    InvalidFormat(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CardError>;

impl CardError {
    /// Maps raw storage failures onto the user-facing error kinds.
    /// Already classified errors pass through unchanged.
    pub fn classify(self) -> Self {
        match self {
            CardError::Io(e) => match e.kind() {
                io::ErrorKind::StorageFull
                | io::ErrorKind::QuotaExceeded
                | io::ErrorKind::FileTooLarge => CardError::QuotaExceeded(e.to_string()),
                _ => CardError::StorageUnavailable(e.to_string()),
            },
            CardError::Serialization(e) => {
                CardError::StorageUnavailable(format!("unreadable stored data: {}", e))
            }
            CardError::Store(msg) => CardError::StorageUnavailable(msg),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_full_is_quota_exceeded() {
        let raw = CardError::Io(io::Error::new(io::ErrorKind::StorageFull, "disk full"));
        assert!(matches!(raw.classify(), CardError::QuotaExceeded(_)));
    }

    #[test]
    fn other_io_is_storage_unavailable() {
        let raw = CardError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "nope"));
        assert!(matches!(raw.classify(), CardError::StorageUnavailable(_)));
    }

    #[test]
    fn backend_message_is_storage_unavailable() {
        let classified = CardError::Store("backend offline".into()).classify();
        match classified {
            CardError::StorageUnavailable(msg) => assert_eq!(msg, "backend offline"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn classified_kinds_pass_through() {
        let id = CardId::from("abc");
        assert!(matches!(
            CardError::NotFound(id).classify(),
            CardError::NotFound(_)
        ));
        assert!(matches!(
            CardError::InvalidFormat("x".into()).classify(),
            CardError::InvalidFormat(_)
        ));
    }
}
