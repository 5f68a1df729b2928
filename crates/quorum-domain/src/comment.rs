//! Comments captured during a review

use crate::{now_millis, CommentId};
use serde::{Deserialize, Serialize};

/// Tag used when a comment is not attached to a component
pub const DEFAULT_TAG: &str = "General";

/// An immutable, tagged note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier
    pub id: CommentId,

    /// Comment body
    pub text: String,

    /// "General" or a component name
    pub tag: String,

    /// Creation time (milliseconds since Unix epoch)
    pub timestamp: u64,
}

impl Comment {
    /// Create a comment stamped with the current time
    pub fn new(text: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: CommentId::new(),
            text: text.into(),
            tag: tag.into(),
            timestamp: now_millis(),
        }
    }
}
