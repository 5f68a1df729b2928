//! Decision card - the unit the board is made of

use crate::{now_millis, CardField, CardId, Confidence, FieldId};
use serde::{Deserialize, Serialize};

/// Title given to cards created by hand
pub const MANUAL_TITLE: &str = "New Decision Card";

/// Title given to cards synthesized from a transcript
pub const TRANSCRIPT_TITLE: &str = "Decision from live transcript";

/// Source recorded on cards created by hand
pub const MANUAL_SOURCE: &str = "Manual entry";

/// A structured record of one decision
///
/// Invariant: `fields` never holds two entries with the same id. Every
/// mutator below preserves it, and deserialization drops later duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CardRecord")]
pub struct DecisionCard {
    /// Unique identifier
    pub id: CardId,

    /// Editable title
    pub title: String,

    /// Creation time (milliseconds since Unix epoch)
    pub created_at: u64,

    /// Fields in insertion order
    fields: Vec<CardField>,

    /// Where the card came from
    pub source: String,

    /// Model confidence, present only on auto-generated cards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
}

/// Wire form of a card, before field ids are de-duplicated
#[derive(Deserialize)]
struct CardRecord {
    id: CardId,
    title: String,
    created_at: u64,
    fields: Vec<CardField>,
    source: String,
    #[serde(default)]
    confidence: Option<Confidence>,
}

impl From<CardRecord> for DecisionCard {
    fn from(record: CardRecord) -> Self {
        let mut card = Self {
            id: record.id,
            title: record.title,
            created_at: record.created_at,
            fields: Vec::with_capacity(record.fields.len()),
            source: record.source,
            confidence: record.confidence,
        };
        for field in record.fields {
            card.add_field(field);
        }
        card
    }
}

impl DecisionCard {
    /// Create a card stamped with the current time
    ///
    /// Later duplicates of a field id are dropped.
    pub fn new(title: impl Into<String>, source: impl Into<String>, fields: Vec<CardField>) -> Self {
        let mut card = Self {
            id: CardId::new(),
            title: title.into(),
            created_at: now_millis(),
            fields: Vec::with_capacity(fields.len()),
            source: source.into(),
            confidence: None,
        };
        for field in fields {
            card.add_field(field);
        }
        card
    }

    /// Attach a model confidence
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Fields in insertion order
    pub fn fields(&self) -> &[CardField] {
        &self.fields
    }

    /// Look up a field by id
    pub fn field(&self, id: FieldId) -> Option<&CardField> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Look up a field by name
    pub fn field_by_name(&self, name: &str) -> Option<&CardField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether the card carries a field with this id
    pub fn has_field(&self, id: FieldId) -> bool {
        self.fields.iter().any(|f| f.id == id)
    }

    /// Append a field; returns false if one with the same id is already present
    pub fn add_field(&mut self, field: CardField) -> bool {
        if self.has_field(field.id) {
            return false;
        }
        self.fields.push(field);
        true
    }

    /// Remove a field by id; returns false if it was not present
    pub fn remove_field(&mut self, id: FieldId) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| f.id != id);
        self.fields.len() != before
    }

    /// Set a field's value; returns false if the card has no such field
    pub fn set_field_value(&mut self, id: FieldId, value: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|f| f.id == id) {
            Some(field) => {
                field.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Subtitle line: model confidence for generated cards, else "Manual capture"
    pub fn subtitle(&self) -> String {
        match self.confidence {
            Some(c) => format!("Model confidence: {}%", c.percent()),
            None => "Manual capture".to_string(),
        }
    }

    /// Footer line joining source and a formatted creation time
    pub fn meta_line(&self, formatted_time: &str) -> String {
        format!("{} • {}", self.source, formatted_time)
    }
}
