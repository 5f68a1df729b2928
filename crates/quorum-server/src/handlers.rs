//! HTTP request handlers for the Quorum server.
//!
//! A JSON API over the in-memory board, plus the transcript intake that feeds
//! the pipeline worker.

use crate::static_files::serve_static;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router as AxumRouter,
};
use chrono::{Local, TimeZone};
use quorum_domain::{parse_options, CardField, CardId, Comment, CommentId, DecisionCard, FieldDefinition, FieldId, FieldType};
use quorum_pipeline::{PipelineError, PipelineStage, StepView, TranscriptQueue};
use quorum_store::{Board, SharedBoard, StoreError, COMPONENTS};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::MutexGuard;
use tracing::{debug, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Board shared with the pipeline worker
    pub board: SharedBoard,
    /// Intake of finalized transcripts
    pub queue: TranscriptQueue,
    /// Directory static assets are served from
    pub static_root: PathBuf,
}

impl AppState {
    /// Bundle the board, the pipeline queue and the asset directory
    pub fn new(board: SharedBoard, queue: TranscriptQueue, static_root: impl Into<PathBuf>) -> Self {
        Self {
            board,
            queue,
            static_root: static_root.into(),
        }
    }

    fn board(&self) -> Result<MutexGuard<'_, Board>, AppError> {
        self.board
            .lock()
            .map_err(|e| AppError::Internal(format!("Board lock poisoned: {}", e)))
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Unknown card, field or component
    NotFound(String),
    /// Malformed or empty input
    BadRequest(String),
    /// Pipeline worker is gone
    Unavailable(String),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::NotFound(e.to_string())
    }
}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::QueueClosed => AppError::Unavailable(e.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// Format a millisecond timestamp as local `HH:MM`
pub fn format_timestamp(millis: u64) -> String {
    format_timestamp_in(millis, &Local)
}

/// Format a millisecond timestamp as `HH:MM` in `tz`
pub fn format_timestamp_in<Tz>(millis: u64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Ok(millis) = i64::try_from(millis) else {
        return String::new();
    };
    tz.timestamp_millis_opt(millis)
        .single()
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// A card field with the value an input would show
#[derive(Debug, Serialize)]
pub struct CardFieldView {
    /// The stored field
    #[serde(flatten)]
    pub field: CardField,
    /// Displayed value (first option for an empty select)
    pub display: String,
}

/// A card as rendered on the board
#[derive(Debug, Serialize)]
pub struct CardView {
    /// Card id
    pub id: CardId,
    /// Title
    pub title: String,
    /// "Model confidence: NN%" or "Manual capture"
    pub subtitle: String,
    /// "<source> • <HH:MM>"
    pub meta: String,
    /// Provenance
    pub source: String,
    /// Creation time (milliseconds since Unix epoch)
    pub created_at: u64,
    /// Rounded confidence, auto-generated cards only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u32>,
    /// Fields in card order
    pub fields: Vec<CardFieldView>,
    /// Schema fields the card does not carry yet
    pub available_fields: Vec<FieldId>,
}

impl CardView {
    fn build(board: &Board, card: &DecisionCard) -> Self {
        let available_fields = board
            .available_fields(card.id)
            .map(|defs| defs.iter().map(|d| d.id).collect())
            .unwrap_or_default();

        Self {
            id: card.id,
            title: card.title.clone(),
            subtitle: card.subtitle(),
            meta: card.meta_line(&format_timestamp(card.created_at)),
            source: card.source.clone(),
            created_at: card.created_at,
            confidence: card.confidence.map(|c| c.percent()),
            fields: card
                .fields()
                .iter()
                .map(|f| CardFieldView {
                    display: f.display_value().to_string(),
                    field: f.clone(),
                })
                .collect(),
            available_fields,
        }
    }

    fn lookup(board: &Board, id: CardId) -> Result<Self, AppError> {
        let card = board.cards().get(id).ok_or(StoreError::CardNotFound(id))?;
        Ok(Self::build(board, card))
    }
}

/// A schema entry with its options description
#[derive(Debug, Serialize)]
pub struct FieldView {
    /// The definition
    #[serde(flatten)]
    pub definition: FieldDefinition,
    /// "Options: a, b" for select fields, empty otherwise
    pub options_summary: String,
}

impl From<&FieldDefinition> for FieldView {
    fn from(def: &FieldDefinition) -> Self {
        Self {
            options_summary: def.options_summary(),
            definition: def.clone(),
        }
    }
}

/// A comment with its display time
#[derive(Debug, Serialize)]
pub struct CommentView {
    /// The comment
    #[serde(flatten)]
    pub comment: Comment,
    /// Local `HH:MM`
    pub time: String,
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        Self {
            time: format_timestamp(comment.timestamp),
            comment: comment.clone(),
        }
    }
}

/// Everything the page renders
#[derive(Debug, Serialize)]
pub struct BoardView {
    /// Field schema in order
    pub fields: Vec<FieldView>,
    /// Cards, newest first
    pub cards: Vec<CardView>,
    /// Comments, newest first
    pub comments: Vec<CommentView>,
    /// Components that can be pointed at
    pub components: Vec<&'static str>,
    /// "Pointing at X" or "Not pointing"
    pub pointing: String,
}

/// Pipeline progress with per-stage status
#[derive(Debug, Serialize)]
pub struct PipelineView {
    /// Stage being held, if any
    pub active: Option<PipelineStage>,
    /// One row per stage
    pub steps: Vec<StepView>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Cards on the board
    pub cards: usize,
    /// Whether a pipeline run is in progress
    pub pipeline_busy: bool,
}

/// Options as a comma-separated string or a list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OptionsInput {
    /// `["a", "b"]`
    List(Vec<String>),
    /// `"a, b"`
    Raw(String),
}

impl Default for OptionsInput {
    fn default() -> Self {
        OptionsInput::List(Vec::new())
    }
}

impl OptionsInput {
    fn into_options(self) -> Vec<String> {
        match self {
            OptionsInput::Raw(raw) => parse_options(&raw),
            OptionsInput::List(list) => list
                .into_iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
        }
    }
}

/// New field definition
#[derive(Debug, Deserialize)]
pub struct CreateFieldRequest {
    /// Display name
    pub name: String,
    /// Input type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Choices, kept for select fields only
    #[serde(default)]
    pub options: OptionsInput,
}

/// New card title
#[derive(Debug, Deserialize)]
pub struct TitleRequest {
    /// Title
    pub title: String,
}

/// Schema field to copy onto a card
#[derive(Debug, Deserialize)]
pub struct AddCardFieldRequest {
    /// Field definition id
    pub field_id: FieldId,
}

/// New field value
#[derive(Debug, Deserialize)]
pub struct FieldValueRequest {
    /// Value
    pub value: String,
}

/// New comment: free text, or a comment on a component
///
/// Exactly one of `text` and `component` must be given.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    /// Comment body
    #[serde(default)]
    pub text: Option<String>,
    /// Tag; "General" when absent
    #[serde(default)]
    pub tag: Option<String>,
    /// Component to comment on, instead of `text`
    #[serde(default)]
    pub component: Option<String>,
}

/// Component being pointed at
#[derive(Debug, Deserialize)]
pub struct PointerRequest {
    /// Component name
    pub component: String,
}

/// Finalized transcript
#[derive(Debug, Deserialize)]
pub struct TranscriptRequest {
    /// Transcript text
    pub text: String,
}

/// Transcript intake result
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptAccepted {
    /// False when the transcript was blank and ignored
    pub queued: bool,
}

/// Response to a card field add/remove
#[derive(Debug, Serialize)]
pub struct CardFieldChange {
    /// Whether anything changed
    pub changed: bool,
    /// Card after the change
    pub card: CardView,
}

fn known_component(name: &str) -> Result<(), AppError> {
    if COMPONENTS.contains(&name) {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("Unknown component: {}", name)))
    }
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Result<Json<HealthCheckResponse>, AppError> {
    let cards = state.board()?.cards().len();
    Ok(Json(HealthCheckResponse {
        status: "healthy".to_string(),
        cards,
        pipeline_busy: state.queue.progress().active.is_some(),
    }))
}

/// GET /api/board
async fn get_board(State(state): State<AppState>) -> Result<Json<BoardView>, AppError> {
    let board = state.board()?;
    Ok(Json(BoardView {
        fields: board.schema().iter().map(FieldView::from).collect(),
        cards: board.cards().iter().map(|c| CardView::build(&board, c)).collect(),
        comments: board.comments().iter().map(CommentView::from).collect(),
        components: COMPONENTS.to_vec(),
        pointing: board.pointer().status(),
    }))
}

/// POST /api/cards - blank card from the current schema
async fn create_card(State(state): State<AppState>) -> Result<(StatusCode, Json<CardView>), AppError> {
    let mut board = state.board()?;
    let id = board.create_empty_card();
    Ok((StatusCode::CREATED, Json(CardView::lookup(&board, id)?)))
}

/// DELETE /api/cards/:id
async fn delete_card(State(state): State<AppState>, Path(id): Path<CardId>) -> Result<StatusCode, AppError> {
    state.board()?.delete_card(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/cards/:id/title
async fn update_title(
    State(state): State<AppState>,
    Path(id): Path<CardId>,
    Json(request): Json<TitleRequest>,
) -> Result<Json<CardView>, AppError> {
    let mut board = state.board()?;
    board.update_card_title(id, request.title)?;
    Ok(Json(CardView::lookup(&board, id)?))
}

/// POST /api/cards/:id/fields
async fn add_card_field(
    State(state): State<AppState>,
    Path(id): Path<CardId>,
    Json(request): Json<AddCardFieldRequest>,
) -> Result<Json<CardFieldChange>, AppError> {
    let mut board = state.board()?;
    let changed = board.add_field_to_card(id, request.field_id)?;
    Ok(Json(CardFieldChange {
        changed,
        card: CardView::lookup(&board, id)?,
    }))
}

/// DELETE /api/cards/:id/fields/:field_id
async fn remove_card_field(
    State(state): State<AppState>,
    Path((id, field_id)): Path<(CardId, FieldId)>,
) -> Result<Json<CardFieldChange>, AppError> {
    let mut board = state.board()?;
    let changed = board.remove_field_from_card(id, field_id)?;
    Ok(Json(CardFieldChange {
        changed,
        card: CardView::lookup(&board, id)?,
    }))
}

/// PUT /api/cards/:id/fields/:field_id
async fn update_field_value(
    State(state): State<AppState>,
    Path((id, field_id)): Path<(CardId, FieldId)>,
    Json(request): Json<FieldValueRequest>,
) -> Result<Json<CardView>, AppError> {
    let mut board = state.board()?;
    board.update_field_value(id, field_id, request.value)?;
    Ok(Json(CardView::lookup(&board, id)?))
}

/// GET /api/fields
async fn list_fields(State(state): State<AppState>) -> Result<Json<Vec<FieldView>>, AppError> {
    let board = state.board()?;
    Ok(Json(board.schema().iter().map(FieldView::from).collect()))
}

/// POST /api/fields - add to the schema and to every card
async fn create_field(
    State(state): State<AppState>,
    Json(request): Json<CreateFieldRequest>,
) -> Result<(StatusCode, Json<FieldView>), AppError> {
    let mut board = state.board()?;
    let id = board
        .add_field(&request.name, request.field_type, request.options.into_options())
        .ok_or_else(|| AppError::BadRequest("Field name must not be empty".to_string()))?;

    let def = board
        .schema()
        .get(id)
        .ok_or_else(|| AppError::Internal(format!("Field {} vanished after insert", id)))?;
    Ok((StatusCode::CREATED, Json(FieldView::from(def))))
}

/// DELETE /api/fields/:id - remove from the schema and from every card
async fn delete_field(State(state): State<AppState>, Path(id): Path<FieldId>) -> Result<StatusCode, AppError> {
    if state.board()?.remove_field(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Field not found: {}", id)))
    }
}

/// GET /api/comments
async fn list_comments(State(state): State<AppState>) -> Result<Json<Vec<CommentView>>, AppError> {
    let board = state.board()?;
    Ok(Json(board.comments().iter().map(CommentView::from).collect()))
}

/// POST /api/comments
async fn create_comment(
    State(state): State<AppState>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentView>), AppError> {
    let mut board = state.board()?;

    let id: CommentId = match (request.component, request.text) {
        (Some(_), Some(_)) => {
            return Err(AppError::BadRequest(
                "Send either comment text or a component, not both".to_string(),
            ))
        }
        (Some(component), None) => {
            known_component(&component)?;
            board.comment_on_component(&component)
        }
        (None, Some(text)) if !text.trim().is_empty() => board.add_comment(text.trim(), request.tag.as_deref()),
        _ => return Err(AppError::BadRequest("Comment text must not be empty".to_string())),
    };

    let comment = board
        .comments()
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| AppError::Internal(format!("Comment {} vanished after insert", id)))?;
    Ok((StatusCode::CREATED, Json(CommentView::from(comment))))
}

/// PUT /api/pointer
async fn point_at(
    State(state): State<AppState>,
    Json(request): Json<PointerRequest>,
) -> Result<StatusCode, AppError> {
    known_component(&request.component)?;
    state.board()?.point_at(request.component);
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/pointer
async fn release_pointer(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.board()?.release_pointer();
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/transcripts - enqueue a finalized transcript
async fn submit_transcript(
    State(state): State<AppState>,
    Json(request): Json<TranscriptRequest>,
) -> Result<(StatusCode, Json<TranscriptAccepted>), AppError> {
    let queued = state.queue.submit(&request.text)?;
    if queued {
        info!("Transcript queued ({} chars)", request.text.trim().len());
    } else {
        debug!("Ignored blank transcript");
    }
    Ok((StatusCode::ACCEPTED, Json(TranscriptAccepted { queued })))
}

/// GET /api/pipeline
async fn pipeline_status(State(state): State<AppState>) -> Json<PipelineView> {
    let progress = state.queue.progress();
    Json(PipelineView {
        active: progress.active,
        steps: progress.steps(),
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check))
        .route("/api/board", get(get_board))
        .route("/api/cards", post(create_card))
        .route("/api/cards/:id", delete(delete_card))
        .route("/api/cards/:id/title", put(update_title))
        .route("/api/cards/:id/fields", post(add_card_field))
        .route(
            "/api/cards/:id/fields/:field_id",
            put(update_field_value).delete(remove_card_field),
        )
        .route("/api/fields", get(list_fields).post(create_field))
        .route("/api/fields/:id", delete(delete_field))
        .route("/api/comments", get(list_comments).post(create_comment))
        .route("/api/pointer", put(point_at).delete(release_pointer))
        .route("/api/transcripts", post(submit_transcript))
        .route("/api/pipeline", get(pipeline_status))
        .fallback(serve_static)
        .with_state(state)
}
