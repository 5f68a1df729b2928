//! Board - the aggregate that owns every store of a session

use crate::{CardStore, CommentLog, FieldSchema, PointerTracker, StoreError};
use quorum_domain::{CardId, Comment, CommentId, DecisionCard, FieldDefinition, FieldId, FieldType};
use quorum_extractor::TranscriptExtractor;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Board shared between the HTTP layer and the pipeline worker
///
/// The lock is never held across an await point.
pub type SharedBoard = Arc<Mutex<Board>>;

/// Which part of the board a mutation touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardChange {
    /// Field definitions were added or removed
    Schema,
    /// Cards were created, deleted or edited
    Cards,
    /// A comment was added
    Comments,
    /// The pointed-at component changed
    Pointer,
}

type Listener = Box<dyn Fn(&BoardChange) + Send + Sync>;

/// Serializable copy of the whole board
#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    /// Field definitions in schema order
    pub fields: Vec<FieldDefinition>,
    /// Cards, newest first
    pub cards: Vec<DecisionCard>,
    /// Comments, newest first
    pub comments: Vec<Comment>,
    /// Component currently pointed at
    pub pointing: Option<String>,
}

/// Field schema, cards and comments of one session
///
/// Every mutation is synchronous. Listeners registered with
/// [`Board::subscribe`] run after each mutation that changed something; they
/// must not call back into the board.
pub struct Board {
    schema: FieldSchema,
    cards: CardStore,
    comments: CommentLog,
    pointer: PointerTracker,
    extractor: TranscriptExtractor,
    listeners: Vec<Listener>,
}

impl Board {
    /// Board with the default schema and no cards
    pub fn new() -> Self {
        Self::with_schema(FieldSchema::defaults())
    }

    /// Board with the given schema and no cards
    pub fn with_schema(schema: FieldSchema) -> Self {
        Self {
            schema,
            cards: CardStore::new(),
            comments: CommentLog::new(),
            pointer: PointerTracker::new(),
            extractor: TranscriptExtractor::default(),
            listeners: Vec::new(),
        }
    }

    /// Use a differently configured extractor for transcript cards
    pub fn with_extractor(mut self, extractor: TranscriptExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Wrap into a [`SharedBoard`]
    pub fn into_shared(self) -> SharedBoard {
        Arc::new(Mutex::new(self))
    }

    /// Register a change listener
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&BoardChange) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&self, change: BoardChange) {
        for listener in &self.listeners {
            listener(&change);
        }
    }

    /// Field schema
    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Card store
    pub fn cards(&self) -> &CardStore {
        &self.cards
    }

    /// Comment log
    pub fn comments(&self) -> &CommentLog {
        &self.comments
    }

    /// Pointer state
    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    /// Add a field definition and append an empty copy of it to every card
    ///
    /// Returns `None` (and changes nothing) if the trimmed name is empty.
    pub fn add_field(&mut self, name: &str, field_type: FieldType, options: Vec<String>) -> Option<FieldId> {
        let def = self.schema.add(name, field_type, options)?.clone();
        self.cards.append_field_everywhere(&def);

        info!("Added field '{}' ({}) to schema and {} cards", def.name, def.field_type, self.cards.len());
        self.notify(BoardChange::Schema);
        self.notify(BoardChange::Cards);
        Some(def.id)
    }

    /// Remove a field definition and its copy on every card
    ///
    /// Returns false if the id was unknown.
    pub fn remove_field(&mut self, id: FieldId) -> bool {
        let Some(def) = self.schema.remove(id) else {
            debug!("Ignoring removal of unknown field {}", id);
            return false;
        };
        let touched = self.cards.remove_field_everywhere(id);

        info!("Removed field '{}' from schema and {} cards", def.name, touched);
        self.notify(BoardChange::Schema);
        self.notify(BoardChange::Cards);
        true
    }

    /// Prepend a blank card built from the current schema
    pub fn create_empty_card(&mut self) -> CardId {
        let id = self.cards.create_empty(&self.schema);
        info!("Created manual card {}", id);
        self.notify(BoardChange::Cards);
        id
    }

    /// Prepend a card synthesized from a finalized transcript
    pub fn create_card_from_transcript(&mut self, transcript: &str) -> CardId {
        let analysis = self.extractor.analyze(transcript);
        let id = self.cards.create_from_analysis(&self.schema, &analysis);
        info!(
            "Created card {} from transcript (confidence {}%)",
            id,
            analysis.confidence.percent()
        );
        self.notify(BoardChange::Cards);
        id
    }

    /// Delete a card
    pub fn delete_card(&mut self, id: CardId) -> Result<(), StoreError> {
        self.cards.delete(id)?;
        info!("Deleted card {}", id);
        self.notify(BoardChange::Cards);
        Ok(())
    }

    /// Replace a card's title
    pub fn update_card_title(&mut self, id: CardId, title: impl Into<String>) -> Result<(), StoreError> {
        self.cards.update_title(id, title)?;
        self.notify(BoardChange::Cards);
        Ok(())
    }

    /// Copy a schema field onto a card; `Ok(false)` if unknown or already present
    pub fn add_field_to_card(&mut self, card_id: CardId, field_id: FieldId) -> Result<bool, StoreError> {
        let added = self.cards.add_field_to_card(card_id, &self.schema, field_id)?;
        if added {
            self.notify(BoardChange::Cards);
        }
        Ok(added)
    }

    /// Remove a field from one card; `Ok(false)` if the card lacked it
    pub fn remove_field_from_card(&mut self, card_id: CardId, field_id: FieldId) -> Result<bool, StoreError> {
        let removed = self.cards.remove_field_from_card(card_id, field_id)?;
        if removed {
            self.notify(BoardChange::Cards);
        }
        Ok(removed)
    }

    /// Set the value of a card field
    pub fn update_field_value(
        &mut self,
        card_id: CardId,
        field_id: FieldId,
        value: impl Into<String>,
    ) -> Result<(), StoreError> {
        self.cards.update_field_value(card_id, field_id, value)?;
        self.notify(BoardChange::Cards);
        Ok(())
    }

    /// Schema entries a card does not carry yet
    pub fn available_fields(&self, card_id: CardId) -> Result<Vec<&FieldDefinition>, StoreError> {
        self.cards.available_fields(card_id, &self.schema)
    }

    /// Prepend a comment; `tag` defaults to "General"
    pub fn add_comment(&mut self, text: impl Into<String>, tag: Option<&str>) -> CommentId {
        let id = self.comments.add(text, tag);
        debug!("Added comment {}", id);
        self.notify(BoardChange::Comments);
        id
    }

    /// Prepend a "Comment on <component>" comment
    pub fn comment_on_component(&mut self, component: &str) -> CommentId {
        let id = self.comments.add_for_component(component);
        self.notify(BoardChange::Comments);
        id
    }

    /// Start pointing at a component
    pub fn point_at(&mut self, component: impl Into<String>) {
        self.pointer.press(component);
        self.notify(BoardChange::Pointer);
    }

    /// Stop pointing
    pub fn release_pointer(&mut self) {
        if self.pointer.release() {
            self.notify(BoardChange::Pointer);
        }
    }

    /// Copy the whole board
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            fields: self.schema.iter().cloned().collect(),
            cards: self.cards.iter().cloned().collect(),
            comments: self.comments.iter().cloned().collect(),
            pointing: self.pointer.active().map(str::to_string),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("fields", &self.schema.len())
            .field("cards", &self.cards.len())
            .field("comments", &self.comments.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
