use crate::error::Result;
use crate::model::CardRecord;
use crate::store::DataStore;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub total_cards: usize,
    pub author_count: usize,
    /// Distinct authors, sorted.
    pub authors: Vec<String>,
    pub type_count: usize,
    /// Distinct types across both slots, sorted.
    pub types: Vec<String>,
    pub oldest: Option<CardRecord>,
    pub newest: Option<CardRecord>,
}

pub fn run<S: DataStore>(store: &S) -> Result<CollectionStats> {
    Ok(compute(&store.get_all()?))
}

pub fn compute(cards: &[CardRecord]) -> CollectionStats {
    let authors: BTreeSet<&str> = cards
        .iter()
        .map(|c| c.fields.author.as_str())
        .filter(|a| !a.is_empty())
        .collect();
    let types: BTreeSet<&str> = cards
        .iter()
        .flat_map(|c| c.fields.types())
        .filter(|t| !t.is_empty())
        .collect();

    // Ties on createdAt go to the smallest id in both directions.
    let oldest = cards
        .iter()
        .min_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    let newest = cards
        .iter()
        .max_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| b.id.cmp(&a.id)));

    CollectionStats {
        total_cards: cards.len(),
        author_count: authors.len(),
        authors: authors.into_iter().map(str::to_string).collect(),
        type_count: types.len(),
        types: types.into_iter().map(str::to_string).collect(),
        oldest: oldest.cloned(),
        newest: newest.cloned(),
    }
}
