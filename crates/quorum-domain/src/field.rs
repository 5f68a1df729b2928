//! Field definitions and the card fields copied from them

use crate::FieldId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Input type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Single-line text
    Text,
    /// Multi-line text
    Textarea,
    /// One of an enumerated list of options
    Select,
}

impl FieldType {
    /// Get the type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
        }
    }
}

impl Default for FieldType {
    fn default() -> Self {
        FieldType::Text
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a comma-separated option list, trimming entries and dropping blanks
pub fn parse_options(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|option| !option.is_empty())
        .map(str::to_string)
        .collect()
}

/// A schema entry shared by all cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Unique identifier
    pub id: FieldId,

    /// Display name
    pub name: String,

    /// Input type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Enumerated options (non-empty only for select fields)
    pub options: Vec<String>,
}

impl FieldDefinition {
    /// Create a definition with a fresh id
    ///
    /// Options are dropped unless `field_type` is [`FieldType::Select`].
    pub fn new(name: impl Into<String>, field_type: FieldType, options: Vec<String>) -> Self {
        let options = if field_type == FieldType::Select {
            options
        } else {
            Vec::new()
        };

        Self {
            id: FieldId::new(),
            name: name.into(),
            field_type,
            options,
        }
    }

    /// Copy this definition into a card field with an empty value
    pub fn instantiate(&self) -> CardField {
        CardField {
            id: self.id,
            name: self.name.clone(),
            field_type: self.field_type,
            options: self.options.clone(),
            value: String::new(),
        }
    }

    /// Human-readable option list for select fields, empty for other types
    pub fn options_summary(&self) -> String {
        if self.field_type != FieldType::Select {
            return String::new();
        }
        if self.options.is_empty() {
            "Options: None".to_string()
        } else {
            format!("Options: {}", self.options.join(", "))
        }
    }
}

/// A field definition copied onto a card, carrying a value
///
/// Independent of its definition once copied: editing the value never touches
/// the schema, and later schema edits do not reach back into the copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardField {
    /// Id of the definition this field was copied from
    pub id: FieldId,

    /// Display name at copy time
    pub name: String,

    /// Input type at copy time
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Options at copy time
    pub options: Vec<String>,

    /// Current value
    pub value: String,
}

impl CardField {
    /// Value as shown in an input
    ///
    /// A select field with no value shows its first option.
    pub fn display_value(&self) -> &str {
        if self.value.is_empty() && self.field_type == FieldType::Select {
            return self.options.first().map(String::as_str).unwrap_or("");
        }
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options() {
        assert_eq!(parse_options(" a, b,,c , "), vec!["a", "b", "c"]);
        assert!(parse_options("").is_empty());
        assert!(parse_options(" , ,").is_empty());
    }

    #[test]
    fn test_options_dropped_for_non_select() {
        let field = FieldDefinition::new("Owner", FieldType::Text, vec!["x".to_string()]);
        assert!(field.options.is_empty());

        let field = FieldDefinition::new("Priority", FieldType::Select, parse_options("Low, High"));
        assert_eq!(field.options, vec!["Low", "High"]);
    }

    #[test]
    fn test_instantiate_copies_with_empty_value() {
        let def = FieldDefinition::new("Priority", FieldType::Select, parse_options("Low, High"));
        let field = def.instantiate();
        assert_eq!(field.id, def.id);
        assert_eq!(field.name, "Priority");
        assert_eq!(field.options, def.options);
        assert_eq!(field.value, "");
    }

    #[test]
    fn test_display_value_for_select() {
        let def = FieldDefinition::new("Priority", FieldType::Select, parse_options("Low, High"));
        let mut field = def.instantiate();
        assert_eq!(field.display_value(), "Low");

        field.value = "High".to_string();
        assert_eq!(field.display_value(), "High");

        let empty = FieldDefinition::new("Empty", FieldType::Select, Vec::new()).instantiate();
        assert_eq!(empty.display_value(), "");
    }

    #[test]
    fn test_options_summary() {
        let select = FieldDefinition::new("S", FieldType::Select, parse_options("a,b"));
        assert_eq!(select.options_summary(), "Options: a, b");

        let none = FieldDefinition::new("S", FieldType::Select, Vec::new());
        assert_eq!(none.options_summary(), "Options: None");

        let text = FieldDefinition::new("T", FieldType::Textarea, Vec::new());
        assert_eq!(text.options_summary(), "");
    }

    #[test]
    fn test_field_type_serde() {
        let def = FieldDefinition::new("Notes", FieldType::Textarea, Vec::new());
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["type"], "textarea");
        let parsed: FieldType = serde_json::from_str("\"select\"").unwrap();
        assert_eq!(parsed, FieldType::Select);
        assert!(serde_json::from_str::<FieldType>("\"checkbox\"").is_err());
    }
}
