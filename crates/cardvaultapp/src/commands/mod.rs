//! # Command Layer
//!
//! The business logic of cardvault. Each operation lives in its own submodule
//! as plain functions over a [`DataStore`](crate::store::DataStore).
//!
//! Commands:
//! - Operate on [`CardRecord`]s and the loose input shapes from [`crate::model`]
//! - Keep the backup mirror in step with the record store after every mutation
//! - Return structured results (`CmdResult`, or a dedicated report type)
//! - Never print, never parse arguments, never classify errors
//!
//! Raw storage errors travel up unchanged; [`crate::api`] classifies them.
//!
//! ## Mutation Protocol
//!
//! Every mutating command follows the same two steps:
//!
//! 1. Write the record store (`put`, `delete`, `clear`).
//! 2. Snapshot the whole store into the mirror. If that fails, the first step is
//!    undone (see [`helpers::snapshot_or_rollback`]) and the error is returned, so
//!    a caller never sees a change reported that the mirror does not hold.
//!
//! ## Testing Strategy
//!
//! Command tests run against [`InMemoryStore`](crate::store::memory::InMemoryStore)
//! and use its failure injection for the rollback paths.
//!
//! ## Command Modules
//!
//! - [`save`]: Create a card from form data
//! - [`update`]: Merge form data over an existing card
//! - [`delete`]: Remove one card
//! - [`clear`]: Remove every card
//! - [`list`]: List and search with filters
//! - [`stats`]: Aggregate collection statistics
//! - [`export`]: Build the portable export document
//! - [`import`]: Re-key and store cards from an export document
//! - [`doctor`]: Compare the record store with the mirror
//! - [`helpers`]: Lookups, ordering and the snapshot/rollback step

use crate::model::CardRecord;
use serde::Serialize;

pub mod clear;
pub mod delete;
pub mod doctor;
pub mod export;
pub mod helpers;
pub mod import;
pub mod list;
pub mod save;
pub mod stats;
pub mod update;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    fn new(level: MessageLevel, content: impl Into<String>) -> Self {
        Self {
            level,
            content: content.into(),
        }
    }

    pub fn info(content: impl Into<String>) -> Self {
        Self::new(MessageLevel::Info, content)
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self::new(MessageLevel::Success, content)
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self::new(MessageLevel::Warning, content)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(MessageLevel::Error, content)
    }
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CmdResult {
    /// Cards written or removed by the command, in the state it left them.
    pub affected_cards: Vec<CardRecord>,
    /// Cards to display, already ordered.
    pub listed_cards: Vec<CardRecord>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_cards(mut self, cards: Vec<CardRecord>) -> Self {
        self.affected_cards = cards;
        self
    }

    pub fn with_listed_cards(mut self, cards: Vec<CardRecord>) -> Self {
        self.listed_cards = cards;
        self
    }

    /// The single card a save or update produced.
    pub fn card(&self) -> Option<&CardRecord> {
        self.affected_cards.first()
    }
}
