//! Quorum Domain Layer
//!
//! Value types shared by every other Quorum crate. Nothing in here holds
//! mutable collections; the stores that own them live in `quorum-store`.
//!
//! ## Key Concepts
//!
//! - **Field Definition**: a reusable schema entry (name, input type, options)
//! - **Card Field**: a copy of a field definition carrying a value
//! - **Decision Card**: a titled, ordered set of card fields with provenance
//! - **Comment**: an immutable, tagged note
//! - **Decision Status**: the four status values a card can carry
//!
//! ## Architecture
//!
//! - Only `uuid`, `serde` and `thiserror` as dependencies
//! - Pure value logic, no I/O
//! - Identifiers are UUIDv7 so they sort by creation time

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod card;
pub mod comment;
pub mod confidence;
pub mod error;
pub mod field;
pub mod ids;
pub mod status;

use std::time::{SystemTime, UNIX_EPOCH};

// Re-exports for convenience
pub use card::DecisionCard;
pub use comment::Comment;
pub use confidence::Confidence;
pub use error::DomainError;
pub use field::{parse_options, CardField, FieldDefinition, FieldType};
pub use ids::{CardId, CommentId, FieldId};
pub use status::DecisionStatus;

/// Milliseconds since the Unix epoch
///
/// Falls back to 0 if the system clock reads earlier than the epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
