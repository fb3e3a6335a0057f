//! # API Facade: the Collection Manager
//!
//! [`CardApi`] is the single entry point for every card operation, whatever the
//! UI. It is a thin layer over [`crate::commands`]:
//!
//! - **Dispatches** to the command function for each operation
//! - **Normalizes inputs** (string ids become [`CardId`]s, the session's current
//!   image fills in a form without one)
//! - **Classifies errors**: every failure leaves here as one of the user-facing
//!   kinds ([`CardError::NotFound`], [`CardError::InvalidFormat`],
//!   [`CardError::StorageUnavailable`], [`CardError::QuotaExceeded`])
//!
//! It does no business logic and no I/O of its own.
//!
//! ## Session
//!
//! State that outlives a single call (reconciliation flags, the card being
//! edited, the current image) lives in a caller-owned [`SessionContext`].
//! Call [`CardApi::initialize`] once per session before anything else.
//!
//! ## Generic Over DataStore
//!
//! - Production: `CardApi<FileStore>`
//! - Testing: `CardApi<InMemoryStore>`

use crate::commands::{self, list::CardFilter, CmdResult};
use crate::commands::{doctor::DoctorReport, export::ExportDocument, stats::CollectionStats};
use crate::error::{CardError, Result};
use crate::model::{CardForm, CardId, CardRecord};
use crate::reconcile::{self, ReconcileReport};
use crate::session::SessionContext;
use crate::store::DataStore;
use serde_json::Value;
use tracing::debug;

/// The main API facade for cardvault operations.
pub struct CardApi<S: DataStore> {
    store: S,
}

impl<S: DataStore> CardApi<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs reconciliation for this session. Never fails; problems are logged
    /// and counted in the report.
    pub fn initialize(&mut self, session: &mut SessionContext) -> ReconcileReport {
        reconcile::run(&mut self.store, session)
    }

    /// Saves a new card. The stored record is `result.card()`.
    pub fn save(&mut self, form: CardForm) -> Result<CmdResult> {
        classified(commands::save::run(&mut self.store, form))
    }

    /// Form submission as the editor sees it: updates the card being edited
    /// (and leaves edit mode) or saves a new one.
    pub fn save_form(&mut self, session: &mut SessionContext, mut form: CardForm) -> Result<CmdResult> {
        let has_image = form.image.as_deref().is_some_and(|i| !i.trim().is_empty());
        if !has_image {
            if let Some(image) = session.current_image() {
                form.image = Some(image.to_string());
            }
        }

        match session.editing().cloned() {
            Some(id) => {
                debug!(id = %id, "saving form in edit mode");
                let result = classified(commands::update::run(&mut self.store, &id, &form))?;
                session.end_edit();
                Ok(result)
            }
            None => {
                let result = self.save(form)?;
                session.set_current_image(None);
                Ok(result)
            }
        }
    }

    /// Loads a card into the session for editing.
    pub fn begin_edit(&self, session: &mut SessionContext, id: &str) -> Result<CardRecord> {
        let card = self.get(id)?;
        session.begin_edit(card.id.clone(), card.fields.image.clone());
        Ok(card)
    }

    pub fn update(&mut self, id: &str, form: &CardForm) -> Result<CmdResult> {
        let id = parse_id(id)?;
        classified(commands::update::run(&mut self.store, &id, form))
    }

    pub fn delete(&mut self, id: &str) -> Result<CmdResult> {
        let id = parse_id(id)?;
        classified(commands::delete::run(&mut self.store, &id))
    }

    pub fn get(&self, id: &str) -> Result<CardRecord> {
        let id = parse_id(id)?;
        classified(commands::helpers::require(&self.store, &id))
    }

    /// Every card, newest first.
    pub fn list(&self) -> Result<CmdResult> {
        self.search(&CardFilter::default())
    }

    pub fn search(&self, filter: &CardFilter) -> Result<CmdResult> {
        classified(commands::list::run(&self.store, filter))
    }

    pub fn stats(&self) -> Result<CollectionStats> {
        classified(commands::stats::run(&self.store))
    }

    pub fn export(&self) -> Result<ExportDocument> {
        classified(commands::export::run(&self.store))
    }

    pub fn import(&mut self, document: &Value) -> Result<CmdResult> {
        classified(commands::import::run(&mut self.store, document))
    }

    /// Imports from raw document text.
    pub fn import_str(&mut self, text: &str) -> Result<CmdResult> {
        let document = commands::import::parse_document(text)?;
        self.import(&document)
    }

    pub fn clear(&mut self) -> Result<CmdResult> {
        classified(commands::clear::run(&mut self.store))
    }

    pub fn doctor(&self) -> Result<DoctorReport> {
        classified(commands::doctor::run(&self.store))
    }
}

fn classified<T>(result: Result<T>) -> Result<T> {
    result.map_err(CardError::classify)
}

/// Blank ids can never exist in the store.
fn parse_id(id: &str) -> Result<CardId> {
    let id = CardId::from(id.trim());
    if id.is_empty() {
        return Err(CardError::NotFound(id));
    }
    Ok(id)
}
