use super::helpers::sort_newest_first;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::CardRecord;
use crate::store::DataStore;

/// Narrows a listing. Every criterion that is set must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFilter {
    /// Case-insensitive substring of name, description or ability name.
    pub query: Option<String>,
    /// Exact author.
    pub author: Option<String>,
    /// Exact type, in either slot.
    pub card_type: Option<String>,
}

impl CardFilter {
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_type(mut self, card_type: impl Into<String>) -> Self {
        self.card_type = Some(card_type.into());
        self
    }

    pub fn matches(&self, card: &CardRecord) -> bool {
        let query_ok = match self.query.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => card.matches_query(q),
            _ => true,
        };
        let author_ok = match non_blank(&self.author) {
            Some(author) => card.fields.author == author,
            None => true,
        };
        let type_ok = match non_blank(&self.card_type) {
            Some(t) => card.has_type(t),
            None => true,
        };
        query_ok && author_ok && type_ok
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// All cards matching `filter`, newest first.
pub fn run<S: DataStore>(store: &S, filter: &CardFilter) -> Result<CmdResult> {
    let mut cards: Vec<CardRecord> = store
        .get_all()?
        .into_iter()
        .filter(|card| filter.matches(card))
        .collect();
    sort_newest_first(&mut cards);
    Ok(CmdResult::default().with_listed_cards(cards))
}
