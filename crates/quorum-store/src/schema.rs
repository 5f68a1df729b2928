//! Field schema - the shared library of field definitions

use quorum_domain::{DecisionStatus, FieldDefinition, FieldId, FieldType};
use serde::Serialize;

/// Ordered set of field definitions shared by all cards
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldSchema {
    fields: Vec<FieldDefinition>,
}

impl FieldSchema {
    /// Schema with no fields
    pub fn empty() -> Self {
        Self { fields: Vec::new() }
    }

    /// The starting schema: Decision, Summary, Rationale, Owner, Status, Due Date
    pub fn defaults() -> Self {
        Self {
            fields: vec![
                FieldDefinition::new("Decision", FieldType::Textarea, Vec::new()),
                FieldDefinition::new("Summary", FieldType::Textarea, Vec::new()),
                FieldDefinition::new("Rationale", FieldType::Textarea, Vec::new()),
                FieldDefinition::new("Owner", FieldType::Text, Vec::new()),
                FieldDefinition::new("Status", FieldType::Select, DecisionStatus::labels()),
                FieldDefinition::new("Due Date", FieldType::Text, Vec::new()),
            ],
        }
    }

    /// Append a definition with a fresh id
    ///
    /// The name is trimmed; an empty name adds nothing and returns `None`.
    pub fn add(
        &mut self,
        name: &str,
        field_type: FieldType,
        options: Vec<String>,
    ) -> Option<&FieldDefinition> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.fields.push(FieldDefinition::new(name, field_type, options));
        self.fields.last()
    }

    /// Remove a definition, returning it if it existed
    pub fn remove(&mut self, id: FieldId) -> Option<FieldDefinition> {
        let index = self.fields.iter().position(|f| f.id == id)?;
        Some(self.fields.remove(index))
    }

    /// Look up a definition by id
    pub fn get(&self, id: FieldId) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Look up a definition by name
    pub fn find_by_name(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Definitions in order
    pub fn iter(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter()
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no definitions
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let schema = FieldSchema::defaults();
        let names: Vec<_> = schema.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Decision", "Summary", "Rationale", "Owner", "Status", "Due Date"]);

        let status = schema.find_by_name("Status").unwrap();
        assert_eq!(status.field_type, FieldType::Select);
        assert_eq!(status.options, vec!["Proposed", "Approved", "Pending", "Needs Review"]);
    }

    #[test]
    fn test_add_trims_and_appends() {
        let mut schema = FieldSchema::empty();
        let id = schema.add("  Risk  ", FieldType::Text, Vec::new()).unwrap().id;
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.get(id).unwrap().name, "Risk");
    }

    #[test]
    fn test_add_empty_name_is_noop() {
        let mut schema = FieldSchema::empty();
        assert!(schema.add("   ", FieldType::Text, Vec::new()).is_none());
        assert!(schema.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut schema = FieldSchema::empty();
        let a = schema.add("Same", FieldType::Text, Vec::new()).unwrap().id;
        let b = schema.add("Same", FieldType::Text, Vec::new()).unwrap().id;
        assert_ne!(a, b);
    }

    #[test]
    fn test_remove() {
        let mut schema = FieldSchema::defaults();
        let id = schema.find_by_name("Owner").unwrap().id;
        assert_eq!(schema.remove(id).unwrap().name, "Owner");
        assert!(schema.remove(id).is_none());
        assert_eq!(schema.len(), 5);
    }
}
