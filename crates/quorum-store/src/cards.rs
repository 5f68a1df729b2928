//! Decision card store

use crate::{FieldSchema, StoreError};
use quorum_domain::card::{MANUAL_SOURCE, MANUAL_TITLE, TRANSCRIPT_TITLE};
use quorum_domain::{CardField, CardId, DecisionCard, FieldDefinition, FieldId};
use quorum_extractor::TranscriptAnalysis;
use serde::Serialize;
use std::collections::VecDeque;

/// Prefix of the source line on cards generated from speech
pub const AUTO_SOURCE_PREFIX: &str = "Auto-generated from speech";

/// Ordered collection of decision cards, newest first
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct CardStore {
    cards: VecDeque<DecisionCard>,
}

impl CardStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a blank card with one empty field per schema entry
    pub fn create_empty(&mut self, schema: &FieldSchema) -> CardId {
        let fields = schema.iter().map(FieldDefinition::instantiate).collect();
        self.push_front(DecisionCard::new(MANUAL_TITLE, MANUAL_SOURCE, fields))
    }

    /// Prepend a card filled from a transcript analysis
    ///
    /// Summary, Decision, Owner and Status are matched by field name; every
    /// other schema field starts empty.
    pub fn create_from_analysis(&mut self, schema: &FieldSchema, analysis: &TranscriptAnalysis) -> CardId {
        let fields: Vec<CardField> = schema
            .iter()
            .map(|def| {
                let mut field = def.instantiate();
                field.value = match def.name.as_str() {
                    "Summary" => analysis.summary.clone(),
                    "Decision" => analysis.decision.clone(),
                    "Owner" => analysis.owner.clone(),
                    "Status" => analysis.status.as_str().to_string(),
                    _ => String::new(),
                };
                field
            })
            .collect();

        let source = format!("{}: \"{}\"", AUTO_SOURCE_PREFIX, analysis.decision.trim());
        let card = DecisionCard::new(TRANSCRIPT_TITLE, source, fields)
            .with_confidence(analysis.confidence);
        self.push_front(card)
    }

    fn push_front(&mut self, card: DecisionCard) -> CardId {
        let id = card.id;
        self.cards.push_front(card);
        id
    }

    /// Delete a card
    pub fn delete(&mut self, id: CardId) -> Result<DecisionCard, StoreError> {
        let index = self.index_of(id)?;
        self.cards.remove(index).ok_or(StoreError::CardNotFound(id))
    }

    /// Replace a card's title
    pub fn update_title(&mut self, id: CardId, title: impl Into<String>) -> Result<(), StoreError> {
        self.get_mut(id)?.title = title.into();
        Ok(())
    }

    /// Copy a schema field onto a card
    ///
    /// Returns `Ok(false)` without changes if the field id is not in the
    /// schema or the card already carries it.
    pub fn add_field_to_card(
        &mut self,
        card_id: CardId,
        schema: &FieldSchema,
        field_id: FieldId,
    ) -> Result<bool, StoreError> {
        let card = self.get_mut(card_id)?;
        match schema.get(field_id) {
            Some(def) => Ok(card.add_field(def.instantiate())),
            None => Ok(false),
        }
    }

    /// Remove a field from one card; `Ok(false)` if the card lacked it
    pub fn remove_field_from_card(&mut self, card_id: CardId, field_id: FieldId) -> Result<bool, StoreError> {
        Ok(self.get_mut(card_id)?.remove_field(field_id))
    }

    /// Set the value of a card field
    pub fn update_field_value(
        &mut self,
        card_id: CardId,
        field_id: FieldId,
        value: impl Into<String>,
    ) -> Result<(), StoreError> {
        if self.get_mut(card_id)?.set_field_value(field_id, value) {
            Ok(())
        } else {
            Err(StoreError::FieldNotOnCard(card_id, field_id))
        }
    }

    /// Schema entries the card does not carry yet, in schema order
    pub fn available_fields<'s>(
        &self,
        card_id: CardId,
        schema: &'s FieldSchema,
    ) -> Result<Vec<&'s FieldDefinition>, StoreError> {
        let card = self.get(card_id).ok_or(StoreError::CardNotFound(card_id))?;
        Ok(schema.iter().filter(|def| !card.has_field(def.id)).collect())
    }

    /// Append a copy of a new definition to every card
    pub(crate) fn append_field_everywhere(&mut self, def: &FieldDefinition) {
        for card in self.cards.iter_mut() {
            card.add_field(def.instantiate());
        }
    }

    /// Remove a field from every card, returning how many cards changed
    pub(crate) fn remove_field_everywhere(&mut self, field_id: FieldId) -> usize {
        self.cards
            .iter_mut()
            .filter_map(|card| card.remove_field(field_id).then_some(()))
            .count()
    }

    /// Look up a card
    pub fn get(&self, id: CardId) -> Option<&DecisionCard> {
        self.cards.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: CardId) -> Result<&mut DecisionCard, StoreError> {
        self.cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::CardNotFound(id))
    }

    fn index_of(&self, id: CardId) -> Result<usize, StoreError> {
        self.cards
            .iter()
            .position(|c| c.id == id)
            .ok_or(StoreError::CardNotFound(id))
    }

    /// Cards, newest first
    pub fn iter(&self) -> impl Iterator<Item = &DecisionCard> {
        self.cards.iter()
    }

    /// Number of cards
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_extractor::TranscriptExtractor;
    use quorum_domain::FieldType;

    #[test]
    fn test_create_empty_matches_schema() {
        let schema = FieldSchema::defaults();
        let mut store = CardStore::new();
        let id = store.create_empty(&schema);

        let card = store.get(id).unwrap();
        assert_eq!(card.fields().len(), schema.len());
        assert!(card.fields().iter().all(|f| f.value.is_empty()));
        assert_eq!(card.source, "Manual entry");
        assert_eq!(card.title, "New Decision Card");
        assert!(card.confidence.is_none());
    }

    #[test]
    fn test_newest_first() {
        let schema = FieldSchema::defaults();
        let mut store = CardStore::new();
        let first = store.create_empty(&schema);
        let second = store.create_empty(&schema);

        let order: Vec<_> = store.iter().map(|c| c.id).collect();
        assert_eq!(order, vec![second, first]);
    }

    #[test]
    fn test_create_from_analysis() {
        let schema = FieldSchema::defaults();
        let mut store = CardStore::new();
        let analysis = TranscriptExtractor::default()
            .analyze("We decide to ship the beta. The owner is Priya. Approved by legal.");
        let id = store.create_from_analysis(&schema, &analysis);

        let card = store.get(id).unwrap();
        assert_eq!(card.title, "Decision from live transcript");
        assert_eq!(card.source, "Auto-generated from speech: \"ship the beta\"");
        assert_eq!(card.field_by_name("Decision").unwrap().value, "ship the beta");
        assert_eq!(card.field_by_name("Owner").unwrap().value, "Priya");
        assert_eq!(card.field_by_name("Status").unwrap().value, "Approved");
        assert_eq!(card.field_by_name("Summary").unwrap().value, analysis.summary);
        assert_eq!(card.field_by_name("Rationale").unwrap().value, "");
        assert_eq!(card.field_by_name("Due Date").unwrap().value, "");
        assert_eq!(card.confidence, Some(analysis.confidence));
    }

    #[test]
    fn test_delete_and_unknown_card() {
        let schema = FieldSchema::defaults();
        let mut store = CardStore::new();
        let id = store.create_empty(&schema);

        assert!(store.delete(id).is_ok());
        assert!(store.is_empty());
        assert_eq!(store.delete(id), Err(StoreError::CardNotFound(id)));
        assert_eq!(store.update_title(id, "x"), Err(StoreError::CardNotFound(id)));
    }

    #[test]
    fn test_add_field_to_card_noops() {
        let mut schema = FieldSchema::defaults();
        let mut store = CardStore::new();
        let card = store.create_empty(&schema);
        let owner = schema.find_by_name("Owner").unwrap().id;

        // already present
        assert_eq!(store.add_field_to_card(card, &schema, owner), Ok(false));
        // unknown field id
        assert_eq!(store.add_field_to_card(card, &schema, FieldId::new()), Ok(false));

        assert_eq!(store.remove_field_from_card(card, owner), Ok(true));
        assert_eq!(store.remove_field_from_card(card, owner), Ok(false));
        assert_eq!(store.add_field_to_card(card, &schema, owner), Ok(true));

        // re-added fields go to the end
        let last = store.get(card).unwrap().fields().last().unwrap();
        assert_eq!(last.id, owner);

        let extra = schema.add("Risk", FieldType::Text, Vec::new()).unwrap().id;
        assert_eq!(store.add_field_to_card(card, &schema, extra), Ok(true));
        assert_eq!(store.get(card).unwrap().fields().len(), schema.len());
    }

    #[test]
    fn test_update_field_value_leaves_schema_alone() {
        let schema = FieldSchema::defaults();
        let mut store = CardStore::new();
        let card = store.create_empty(&schema);
        let status = schema.find_by_name("Status").unwrap().id;

        store.update_field_value(card, status, "Pending").unwrap();
        assert_eq!(store.get(card).unwrap().field(status).unwrap().value, "Pending");
        assert_eq!(schema.get(status).unwrap().options.len(), 4);

        let missing = FieldId::new();
        assert_eq!(
            store.update_field_value(card, missing, "x"),
            Err(StoreError::FieldNotOnCard(card, missing))
        );
    }

    #[test]
    fn test_available_fields() {
        let schema = FieldSchema::defaults();
        let mut store = CardStore::new();
        let card = store.create_empty(&schema);
        assert!(store.available_fields(card, &schema).unwrap().is_empty());

        let rationale = schema.find_by_name("Rationale").unwrap().id;
        store.remove_field_from_card(card, rationale).unwrap();
        let available = store.available_fields(card, &schema).unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, rationale);
    }
}
