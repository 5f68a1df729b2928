//! Identifiers for schema fields, cards and comments
//!
//! All three are UUIDv7 newtypes. UUIDv7 gives:
//! - Chronological sortability (newer ids compare greater)
//! - 128-bit uniqueness without coordination
//! - A standard string form for the JSON boundary

use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new UUIDv7-based identifier
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wrap an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Borrow the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Timestamp component of the UUIDv7 (milliseconds since Unix epoch)
            pub fn timestamp(&self) -> u64 {
                // UUIDv7: top 48 bits are Unix millisecond timestamp
                (self.0.as_u128() >> 80) as u64
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| DomainError::InvalidId(format!("{}: {}", s, e)))
            }
        }
    };
}

define_id!(
    /// Identifier of a field definition, shared by every card field copied from it
    FieldId
);

define_id!(
    /// Identifier of a decision card
    CardId
);

define_id!(
    /// Identifier of a comment
    CommentId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_chronological() {
        let id1 = CardId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = CardId::new();

        assert!(id1 < id2, "Earlier UUIDv7 should be less than later UUIDv7");
        assert!(id1.timestamp() <= id2.timestamp());
    }

    #[test]
    fn test_display_and_parse() {
        let id = FieldId::new();
        let text = id.to_string();
        assert_eq!(text.len(), 36);

        let parsed: FieldId = text.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_invalid_string() {
        assert!("not-a-uuid".parse::<CommentId>().is_err());
        assert!("".parse::<CommentId>().is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = CardId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }
}
