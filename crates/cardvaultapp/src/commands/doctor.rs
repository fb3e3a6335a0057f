use crate::commands::CmdMessage;
use crate::error::Result;
use crate::model::CardId;
use crate::store::DataStore;
use serde::Serialize;
use std::collections::BTreeSet;

/// A read-only comparison of the record store and the backup mirror.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorReport {
    pub location: String,
    pub available: bool,
    pub store_count: usize,
    pub mirror_count: usize,
    /// Ids in the mirror that the store lacks. Reconciliation may recover them.
    pub missing_from_store: Vec<CardId>,
    /// Ids in the store that the mirror lacks. The next mutation re-mirrors them.
    pub missing_from_mirror: Vec<CardId>,
}

impl DoctorReport {
    pub fn in_sync(&self) -> bool {
        self.available && self.missing_from_store.is_empty() && self.missing_from_mirror.is_empty()
    }

    pub fn messages(&self) -> Vec<CmdMessage> {
        if !self.available {
            return vec![CmdMessage::error(format!(
                "Storage at {} is not available",
                self.location
            ))];
        }

        let mut messages = vec![CmdMessage::info(format!(
            "{} card(s) in store, {} in backup mirror ({})",
            self.store_count, self.mirror_count, self.location
        ))];
        if self.in_sync() {
            messages.push(CmdMessage::success("Store and backup mirror agree."));
            return messages;
        }
        if !self.missing_from_store.is_empty() {
            messages.push(CmdMessage::warning(format!(
                "  - {} card(s) only in the backup mirror",
                self.missing_from_store.len()
            )));
        }
        if !self.missing_from_mirror.is_empty() {
            messages.push(CmdMessage::warning(format!(
                "  - {} card(s) not yet in the backup mirror",
                self.missing_from_mirror.len()
            )));
        }
        messages
    }
}

pub fn run<S: DataStore>(store: &S) -> Result<DoctorReport> {
    let location = store.location();
    if !store.available() {
        return Ok(DoctorReport {
            location,
            ..Default::default()
        });
    }

    let stored: BTreeSet<CardId> = store.get_all()?.into_iter().map(|c| c.id).collect();
    let mirror = store.read_snapshot()?;
    let store_count = stored.len();
    let mirror_count = mirror.len();
    let mirrored: BTreeSet<CardId> = mirror.into_iter().map(|c| c.id).collect();

    Ok(DoctorReport {
        location,
        available: true,
        store_count,
        mirror_count,
        missing_from_store: mirrored.difference(&stored).cloned().collect(),
        missing_from_mirror: stored.difference(&mirrored).cloned().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::model::{CardForm, PendingCard};
    use crate::store::memory::fixtures::{detached_record, StoreFixture};
    use crate::store::RecordStore;

    #[test]
    fn consistent_store_is_in_sync() {
        let store = StoreFixture::new().with_cards(2).store;
        let report = run(&store).unwrap();

        assert!(report.in_sync());
        assert_eq!(report.store_count, 2);
        assert_eq!(report.mirror_count, 2);
        assert!(report
            .messages()
            .iter()
            .any(|m| m.level == MessageLevel::Success));
    }

    #[test]
    fn reports_both_directions() {
        let mut store = StoreFixture::new()
            .with_mirror_only(&[detached_record("lost", "Lost")])
            .store;
        store
            .put(PendingCard::from_form(CardForm::named("Unmirrored")))
            .unwrap();

        let report = run(&store).unwrap();

        assert!(!report.in_sync());
        assert_eq!(report.missing_from_store, vec![CardId::from("lost")]);
        assert_eq!(report.missing_from_mirror.len(), 1);
        let warnings = report
            .messages()
            .into_iter()
            .filter(|m| m.level == MessageLevel::Warning)
            .count();
        assert_eq!(warnings, 2);
    }

    #[test]
    fn unavailable_backend_is_reported() {
        let store = StoreFixture::new().store;
        store.backend().set_simulate_unavailable(true);

        let report = run(&store).unwrap();

        assert!(!report.available);
        assert!(!report.in_sync());
        assert_eq!(report.messages()[0].level, MessageLevel::Error);
    }
}
