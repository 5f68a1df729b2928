//! Quorum Storage Layer
//!
//! In-memory stores for one capture session: the field schema, the decision
//! cards built from it, and the comment log.
//!
//! # Architecture
//!
//! - [`FieldSchema`]: ordered field definitions shared by all cards
//! - [`CardStore`]: cards, newest first
//! - [`CommentLog`]: comments, newest first, append-only
//! - [`Board`]: owns all three, cascades schema changes into cards and
//!   notifies subscribers after every mutation
//!
//! Nothing is persisted; a board lives as long as its owner.
//!
//! # Examples
//!
//! ```
//! use quorum_store::{Board, BoardChange};
//! use quorum_domain::FieldType;
//!
//! let mut board = Board::new();
//! board.subscribe(|change: &BoardChange| println!("changed: {:?}", change));
//!
//! let card = board.create_empty_card();
//! let field = board.add_field("Priority", FieldType::Select, vec!["Low".into(), "High".into()]).unwrap();
//! assert!(board.cards().get(card).unwrap().has_field(field));
//! ```

#![warn(missing_docs)]

mod board;
mod cards;
mod comments;
mod error;
mod pointer;
mod schema;

pub use board::{Board, BoardChange, BoardSnapshot, SharedBoard};
pub use cards::{CardStore, AUTO_SOURCE_PREFIX};
pub use comments::CommentLog;
pub use error::StoreError;
pub use pointer::{PointerTracker, COMPONENTS};
pub use schema::FieldSchema;
