//! # Domain Model: Cards, Forms and Field Coercion
//!
//! This module defines the persisted unit, [`CardRecord`], the loose input shapes
//! that become records ([`CardForm`] from the form collaborator, [`PendingCard`]
//! from import documents and mirror snapshots), and the rules that turn loose
//! input into a well-formed record.
//!
//! ## The Problem
//!
//! Cards arrive from three places, none of which can be trusted to be tidy:
//! - The form: every value is a string, often blank.
//! - Import documents: written by older versions, other tools, or by hand.
//! - The backup mirror: usually ours, but possibly a legacy flat list with
//!   numeric ids and string stats.
//!
//! ## Normalization Rules
//!
//! 1. **Stats** (`hp`, `attack`, `defense`): read like a browser `parseInt`
//!    (leading sign and digits, `"75hp"` → 75). Non-numeric or missing → 60/40/30.
//! 2. **Types**: if `type2` equals `type1` it is cleared. A blank `type1` becomes `Normal`.
//! 3. **Blank optional strings** (`type2`, `weakness`, `resistance`, `image`) are dropped.
//! 4. **Blank required text** gets the form defaults (`Unknown Creature`, `Unknown`, ...).
//!
//! ## Identity
//!
//! [`CardId`] is an opaque string. Fresh ids are the Unix time in milliseconds
//! followed by a 9 character base36 random suffix. Legacy numeric ids are read as
//! their decimal string.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

pub const DEFAULT_HP: i64 = 60;
pub const DEFAULT_ATTACK: i64 = 40;
pub const DEFAULT_DEFENSE: i64 = 30;

pub const DEFAULT_NAME: &str = "Unknown Creature";
pub const DEFAULT_AUTHOR: &str = "Unknown";
pub const DEFAULT_TYPE: &str = "Normal";
pub const DEFAULT_DESCRIPTION: &str = "A mysterious creature";
pub const DEFAULT_ABILITY_NAME: &str = "Special Ability";
pub const DEFAULT_ABILITY_DESCRIPTION: &str = "An amazing ability!";

const ID_SUFFIX_LEN: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Millisecond timestamp plus a random base36 suffix.
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis();
        Self(format!("{}{}", millis, random_suffix()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

fn random_suffix() -> String {
    let mut bits = Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(ID_SUFFIX_LEN);
    for _ in 0..ID_SUFFIX_LEN {
        let digit = (bits % 36) as u32;
        suffix.push(std::char::from_digit(digit, 36).unwrap_or('0'));
        bits /= 36;
    }
    suffix
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CardId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// Legacy collections stored `Date.now()` as a bare number.
impl<'de> Deserialize<'de> for CardId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(CardId(s)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(CardId(i.to_string()))
                } else if let Some(u) = n.as_u64() {
                    Ok(CardId(u.to_string()))
                } else {
                    let f = n.as_f64().unwrap_or_default();
                    if f.fract() == 0.0 && f.is_finite() {
                        Ok(CardId(format!("{:.0}", f)))
                    } else {
                        Ok(CardId(n.to_string()))
                    }
                }
            }
            other => Err(D::Error::custom(format!(
                "card id must be a string or number, got {}",
                other
            ))),
        }
    }
}

/// Parses a stat the way the form always has: optional whitespace and sign,
/// then the leading run of ASCII digits. Returns `None` when there are no digits.
pub fn parse_stat(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let value: i64 = rest[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Coerces an arbitrary JSON value into a stat, `None` if it is not numeric.
pub fn coerce_stat(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => parse_stat(s),
        _ => None,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn or_default(value: Option<String>, default: &str) -> String {
    non_blank(value).unwrap_or_else(|| default.to_string())
}

/// The user-authored content of a card: everything except identity and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardFields {
    pub name: String,
    pub author: String,
    pub type1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type2: Option<String>,
    pub description: String,
    pub hp: i64,
    pub attack: i64,
    pub defense: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weakness: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resistance: Option<String>,
    pub ability_name: String,
    pub ability_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imported_at: Option<DateTime<Utc>>,
}

impl Default for CardFields {
    fn default() -> Self {
        RawCard::default().into_fields()
    }
}

impl CardFields {
    /// Applies the invariants that hold for every persisted card.
    pub fn normalize(&mut self) {
        if self.type1.trim().is_empty() {
            self.type1 = DEFAULT_TYPE.to_string();
        }
        self.type2 = non_blank(self.type2.take());
        if self.type2.as_deref() == Some(self.type1.as_str()) {
            self.type2 = None;
        }
        self.weakness = non_blank(self.weakness.take());
        self.resistance = non_blank(self.resistance.take());
        self.image = non_blank(self.image.take());
    }

    /// Overlays the fields present in `form`. Absent fields keep their value;
    /// present-but-blank fields fall back to defaults (or are cleared when optional).
    pub fn apply_form(&mut self, form: &CardForm) {
        if let Some(name) = &form.name {
            self.name = or_default(Some(name.clone()), DEFAULT_NAME);
        }
        if let Some(author) = &form.author {
            self.author = or_default(Some(author.clone()), DEFAULT_AUTHOR);
        }
        if let Some(type1) = &form.type1 {
            self.type1 = or_default(Some(type1.clone()), DEFAULT_TYPE);
        }
        if let Some(type2) = &form.type2 {
            self.type2 = Some(type2.clone());
        }
        if let Some(description) = &form.description {
            self.description = or_default(Some(description.clone()), DEFAULT_DESCRIPTION);
        }
        if let Some(hp) = &form.hp {
            self.hp = parse_stat(hp).unwrap_or(DEFAULT_HP);
        }
        if let Some(attack) = &form.attack {
            self.attack = parse_stat(attack).unwrap_or(DEFAULT_ATTACK);
        }
        if let Some(defense) = &form.defense {
            self.defense = parse_stat(defense).unwrap_or(DEFAULT_DEFENSE);
        }
        if let Some(weakness) = &form.weakness {
            self.weakness = Some(weakness.clone());
        }
        if let Some(resistance) = &form.resistance {
            self.resistance = Some(resistance.clone());
        }
        if let Some(ability_name) = &form.ability_name {
            self.ability_name = or_default(Some(ability_name.clone()), DEFAULT_ABILITY_NAME);
        }
        if let Some(ability_description) = &form.ability_description {
            self.ability_description = or_default(
                Some(ability_description.clone()),
                DEFAULT_ABILITY_DESCRIPTION,
            );
        }
        if let Some(image) = &form.image {
            self.image = Some(image.clone());
        }
        self.normalize();
    }

    /// Both type slots, skipping the empty second slot.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.type1.as_str()).chain(self.type2.as_deref())
    }
}

/// A persisted card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub id: CardId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: CardFields,
}

impl CardRecord {
    /// Case-insensitive match against name, description and ability name.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.fields.name.to_lowercase().contains(&needle)
            || self.fields.description.to_lowercase().contains(&needle)
            || self.fields.ability_name.to_lowercase().contains(&needle)
    }

    pub fn has_type(&self, card_type: &str) -> bool {
        self.fields.types().any(|t| t == card_type)
    }
}

// Records are read back from our own store, from mirror snapshots and from
// import documents, so decoding goes through the lenient `RawCard` shape.
impl<'de> Deserialize<'de> for CardRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut raw = RawCard::deserialize(deserializer)?;
        let id = raw
            .id
            .take()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| D::Error::missing_field("id"))?;
        let created_at = raw
            .created_at
            .or(raw.updated_at)
            .ok_or_else(|| D::Error::missing_field("createdAt"))?;
        let updated_at = raw.updated_at.unwrap_or(created_at).max(created_at);
        Ok(CardRecord {
            id,
            created_at,
            updated_at,
            fields: raw.into_fields(),
        })
    }
}

/// A card on its way into the record store. `id` and `created_at` are assigned
/// by the store when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CardId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub fields: CardFields,
}

impl PendingCard {
    pub fn from_form(form: CardForm) -> Self {
        let raw = RawCard::from(form);
        Self {
            id: None,
            created_at: None,
            fields: raw.into_fields(),
        }
    }

    /// Drops the incoming id and stamps the import time.
    pub fn rekeyed(mut self, imported_at: DateTime<Utc>) -> Self {
        self.id = None;
        self.fields.imported_at = Some(imported_at);
        self
    }
}

impl From<CardRecord> for PendingCard {
    fn from(record: CardRecord) -> Self {
        Self {
            id: Some(record.id),
            created_at: Some(record.created_at),
            fields: record.fields,
        }
    }
}

impl<'de> Deserialize<'de> for PendingCard {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut raw = RawCard::deserialize(deserializer)?;
        Ok(PendingCard {
            id: raw.id.take().filter(|id| !id.is_empty()),
            created_at: raw.created_at.take(),
            fields: raw.into_fields(),
        })
    }
}

/// Flat key/value data from the form collaborator. Every value is an optional
/// string, exactly as an HTML form would submit it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardForm {
    pub name: Option<String>,
    pub author: Option<String>,
    pub type1: Option<String>,
    pub type2: Option<String>,
    pub description: Option<String>,
    pub hp: Option<String>,
    pub attack: Option<String>,
    pub defense: Option<String>,
    pub weakness: Option<String>,
    pub resistance: Option<String>,
    pub ability_name: Option<String>,
    pub ability_description: Option<String>,
    pub image: Option<String>,
}

impl CardForm {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_types(mut self, type1: impl Into<String>, type2: Option<&str>) -> Self {
        self.type1 = Some(type1.into());
        self.type2 = type2.map(str::to_string);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_stats(mut self, hp: &str, attack: &str, defense: &str) -> Self {
        self.hp = Some(hp.to_string());
        self.attack = Some(attack.to_string());
        self.defense = Some(defense.to_string());
        self
    }

    pub fn with_ability(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.ability_name = Some(name.into());
        self.ability_description = Some(description.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RawCard {
    id: Option<CardId>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    name: Option<String>,
    author: Option<String>,
    type1: Option<String>,
    type2: Option<String>,
    description: Option<String>,
    hp: Option<Value>,
    attack: Option<Value>,
    defense: Option<Value>,
    weakness: Option<String>,
    resistance: Option<String>,
    ability_name: Option<String>,
    ability_description: Option<String>,
    image: Option<String>,
    imported_at: Option<DateTime<Utc>>,
}

impl RawCard {
    fn into_fields(self) -> CardFields {
        let stat = |value: Option<Value>, default: i64| {
            value.as_ref().and_then(coerce_stat).unwrap_or(default)
        };
        let mut fields = CardFields {
            name: or_default(self.name, DEFAULT_NAME),
            author: or_default(self.author, DEFAULT_AUTHOR),
            type1: or_default(self.type1, DEFAULT_TYPE),
            type2: self.type2,
            description: or_default(self.description, DEFAULT_DESCRIPTION),
            hp: stat(self.hp, DEFAULT_HP),
            attack: stat(self.attack, DEFAULT_ATTACK),
            defense: stat(self.defense, DEFAULT_DEFENSE),
            weakness: self.weakness,
            resistance: self.resistance,
            ability_name: or_default(self.ability_name, DEFAULT_ABILITY_NAME),
            ability_description: or_default(self.ability_description, DEFAULT_ABILITY_DESCRIPTION),
            image: self.image,
            imported_at: self.imported_at,
        };
        fields.normalize();
        fields
    }
}

impl From<CardForm> for RawCard {
    fn from(form: CardForm) -> Self {
        RawCard {
            name: form.name,
            author: form.author,
            type1: form.type1,
            type2: form.type2,
            description: form.description,
            hp: form.hp.map(Value::String),
            attack: form.attack.map(Value::String),
            defense: form.defense.map(Value::String),
            weakness: form.weakness,
            resistance: form.resistance,
            ability_name: form.ability_name,
            ability_description: form.ability_description,
            image: form.image,
            ..Default::default()
        }
    }
}
