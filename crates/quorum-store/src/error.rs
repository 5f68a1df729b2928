//! Error types for store operations

use quorum_domain::{CardId, FieldId};
use thiserror::Error;

/// Errors that can occur during store operations
///
/// A missing card is an error, and so is setting the value of a field the
/// card does not carry. Unknown field ids and duplicate field additions are
/// reported as "nothing changed" instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Card not found
    #[error("Card not found: {0}")]
    CardNotFound(CardId),

    /// Card does not carry the field
    #[error("Field {1} not found on card {0}")]
    FieldNotOnCard(CardId, FieldId),
}
