//! The portable export document.
//!
//! ```json
//! { "exportDate": "2024-05-01T12:00:00Z", "cardCount": 2, "cards": [ ... ] }
//! ```
//!
//! Cards are written exactly as stored, ids included. Importing the document
//! re-keys them, so exporting and importing into the same collection doubles it.

use super::helpers::sort_newest_first;
use crate::error::{CardError, Result};
use crate::model::CardRecord;
use crate::store::DataStore;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub export_date: DateTime<Utc>,
    pub card_count: usize,
    pub cards: Vec<CardRecord>,
}

impl ExportDocument {
    pub fn new(mut cards: Vec<CardRecord>) -> Self {
        sort_newest_first(&mut cards);
        Self {
            export_date: Utc::now(),
            card_count: cards.len(),
            cards,
        }
    }

    /// Two-space indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(CardError::Serialization)
    }
}

/// `<prefix>-YYYY-MM-DD.json`
pub fn default_file_name(prefix: &str, date: NaiveDate) -> String {
    let prefix = match prefix.trim() {
        "" => "cards",
        p => p,
    };
    format!("{}-{}.json", prefix, date.format("%Y-%m-%d"))
}

pub fn run<S: DataStore>(store: &S) -> Result<ExportDocument> {
    Ok(ExportDocument::new(store.get_all()?))
}
