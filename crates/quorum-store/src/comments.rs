//! Append-only comment log

use quorum_domain::comment::DEFAULT_TAG;
use quorum_domain::{Comment, CommentId};
use serde::Serialize;
use std::collections::VecDeque;

/// Comments, newest first. There is no update or delete.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct CommentLog {
    entries: VecDeque<Comment>,
}

impl CommentLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a comment; `tag` defaults to "General"
    pub fn add(&mut self, text: impl Into<String>, tag: Option<&str>) -> CommentId {
        let comment = Comment::new(text, tag.unwrap_or(DEFAULT_TAG));
        let id = comment.id;
        self.entries.push_front(comment);
        id
    }

    /// Prepend a "Comment on <component>" entry tagged with the component
    pub fn add_for_component(&mut self, component: &str) -> CommentId {
        self.add(format!("Comment on {}", component), Some(component))
    }

    /// Comments, newest first
    pub fn iter(&self) -> impl Iterator<Item = &Comment> {
        self.entries.iter()
    }

    /// Number of comments
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
