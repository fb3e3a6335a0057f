//! Caller-owned session state.
//!
//! Everything that lived in page-global variables before (the reconciliation
//! flags, the image currently attached to the form, the card being edited) is
//! held here and passed into the API explicitly. For the CLI one process is one
//! session, so a fresh [`SessionContext`] is created per invocation.

use crate::model::CardId;

/// Gates each reconciliation phase to at most one attempt per session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionFlags {
    pub restore_attempted: bool,
    pub migration_attempted: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub flags: SessionFlags,
    current_image: Option<String>,
    editing: Option<CardId>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_edit(&mut self, id: CardId, image: Option<String>) {
        self.editing = Some(id);
        self.current_image = image;
    }

    /// Leaves edit mode and forgets the current image.
    pub fn end_edit(&mut self) {
        self.editing = None;
        self.current_image = None;
    }

    pub fn editing(&self) -> Option<&CardId> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn current_image(&self) -> Option<&str> {
        self.current_image.as_deref()
    }

    pub fn set_current_image(&mut self, image: Option<String>) {
        self.current_image = image.filter(|s| !s.trim().is_empty());
    }
}
