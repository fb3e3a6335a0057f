//! # Reconciliation
//!
//! Runs once at startup, before any other operation, to bring the record store
//! back in line with the backup mirror after the store was wiped or partially
//! lost. It is strictly additive: it never deletes and never overwrites a record
//! that is already in the store.
//!
//! ## Phases
//!
//! ```text
//! NotStarted ──► RestoreChecked ──► MigrateChecked ──► Done
//! ```
//!
//! 1. **Restore**: the store is empty and the mirror is not. Every mirror record
//!    is written back with its id and `createdAt` intact.
//! 2. **Migrate**: the mirror holds a different number of records than the
//!    store. Every mirror record whose id the store lacks is inserted. A mirror
//!    and store of equal size are assumed to agree, even if their ids differ.
//!
//! Each phase is attempted at most once per session ([`SessionFlags`]), and its
//! flag is set whether or not the phase found anything to do or succeeded.
//!
//! Planning ([`plan_restore`], [`plan_migrate`]) is pure and independent of any
//! storage. [`run`] gathers the inputs, applies the plans and logs failures.
//! Nothing here is fatal: a broken mirror or an unavailable store yields a
//! report with the failure counted, never an error.

use crate::model::{CardId, CardRecord, PendingCard};
use crate::session::{SessionContext, SessionFlags};
use crate::store::{DataStore, RecordStore};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReconcileState {
    #[default]
    NotStarted,
    RestoreChecked,
    MigrateChecked,
    Done,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub restored: usize,
    pub migrated: usize,
    /// Records that could not be written, plus phases that could not read their inputs.
    pub failed: usize,
    pub restore_skipped: bool,
    pub migrate_skipped: bool,
    pub state: ReconcileState,
}

impl ReconcileReport {
    pub fn written(&self) -> usize {
        self.restored + self.migrated
    }
}

/// Mirror records in snapshot order, keeping only the first record for each id.
fn unique_by_id<'a>(mirror: &'a [CardRecord]) -> impl Iterator<Item = &'a CardRecord> {
    let mut seen = HashSet::new();
    mirror.iter().filter(move |r| seen.insert(r.id.clone()))
}

/// Records the restore phase should write, or `None` when the phase was
/// already attempted this session.
pub fn plan_restore(
    store_count: usize,
    mirror: &[CardRecord],
    flags: &SessionFlags,
) -> Option<Vec<CardRecord>> {
    if flags.restore_attempted {
        return None;
    }
    if store_count > 0 || mirror.is_empty() {
        return Some(Vec::new());
    }
    Some(unique_by_id(mirror).cloned().collect())
}

/// Records the migrate phase should insert, or `None` when the phase was
/// already attempted this session.
pub fn plan_migrate(
    store_ids: &HashSet<CardId>,
    mirror: &[CardRecord],
    flags: &SessionFlags,
) -> Option<Vec<CardRecord>> {
    if flags.migration_attempted {
        return None;
    }
    if mirror.is_empty() || mirror.len() == store_ids.len() {
        return Some(Vec::new());
    }
    Some(
        unique_by_id(mirror)
            .filter(|r| !store_ids.contains(&r.id))
            .cloned()
            .collect(),
    )
}

fn store_ids<S: RecordStore>(store: &S) -> crate::error::Result<HashSet<CardId>> {
    Ok(store.get_all()?.into_iter().map(|r| r.id).collect())
}

/// Writes every planned record, returning how many succeeded.
fn apply<S: RecordStore>(store: &mut S, plan: Vec<CardRecord>, failed: &mut usize) -> usize {
    let mut written = 0;
    for record in plan {
        let id = record.id.clone();
        match store.put(PendingCard::from(record)) {
            Ok(_) => written += 1,
            Err(e) => {
                *failed += 1;
                warn!(id = %id, error = %e, "could not write mirror record to store");
            }
        }
    }
    written
}

/// Runs both phases against `store`, updating the session flags.
pub fn run<S: DataStore>(store: &mut S, session: &mut SessionContext) -> ReconcileReport {
    let flags = session.flags;
    let mut report = ReconcileReport {
        restore_skipped: flags.restore_attempted,
        migrate_skipped: flags.migration_attempted,
        ..Default::default()
    };

    if flags.restore_attempted && flags.migration_attempted {
        debug!("reconciliation already attempted this session");
        report.state = ReconcileState::Done;
        return report;
    }

    let mirror = match store.read_snapshot() {
        Ok(mirror) => mirror,
        Err(e) => {
            warn!(error = %e, "could not read backup mirror, skipping reconciliation");
            session.flags.restore_attempted = true;
            session.flags.migration_attempted = true;
            report.failed += 1;
            report.state = ReconcileState::Done;
            return report;
        }
    };

    // --- Restore ---
    session.flags.restore_attempted = true;
    match store_ids(store) {
        Ok(ids) => {
            if let Some(plan) = plan_restore(ids.len(), &mirror, &flags) {
                if !plan.is_empty() {
                    info!(count = plan.len(), "restoring store from backup mirror");
                }
                report.restored = apply(store, plan, &mut report.failed);
            }
        }
        Err(e) => {
            warn!(error = %e, "could not read store for restore check");
            report.failed += 1;
        }
    }
    report.state = ReconcileState::RestoreChecked;

    // --- Migrate ---
    session.flags.migration_attempted = true;
    match store_ids(store) {
        Ok(ids) => {
            if let Some(plan) = plan_migrate(&ids, &mirror, &flags) {
                if !plan.is_empty() {
                    info!(count = plan.len(), "migrating missing records from backup mirror");
                }
                report.migrated = apply(store, plan, &mut report.failed);
            }
        }
        Err(e) => {
            warn!(error = %e, "could not read store for migration check");
            report.failed += 1;
        }
    }
    report.state = ReconcileState::MigrateChecked;

    // Writes refresh updatedAt, so the mirror is re-taken from the store.
    if report.written() > 0 {
        let snapshot = store.get_all().and_then(|all| store.write_snapshot(&all));
        if let Err(e) = snapshot {
            warn!(error = %e, "could not refresh backup mirror after reconciliation");
        }
    }

    report.state = ReconcileState::Done;
    debug!(?report, "reconciliation finished");
    report
}
