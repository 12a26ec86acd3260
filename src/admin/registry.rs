//! Records currently shown by a panel, addressable by id.

use std::collections::HashMap;

use crate::api::{ConversationSummary, CustomGuideline, Memory, Reflection, TraitEntry};

/// A record the console can point at from a command such as `delete 3`.
pub trait Keyed {
    fn key(&self) -> Option<String>;
}

impl Keyed for ConversationSummary {
    fn key(&self) -> Option<String> {
        Some(self.id.to_string())
    }
}

impl Keyed for CustomGuideline {
    fn key(&self) -> Option<String> {
        Some(self.key.clone())
    }
}

impl Keyed for Reflection {
    fn key(&self) -> Option<String> {
        self.id.as_ref().map(ToString::to_string)
    }
}

impl Keyed for Memory {
    fn key(&self) -> Option<String> {
        self.id.as_ref().map(ToString::to_string)
    }
}

impl Keyed for TraitEntry {
    fn key(&self) -> Option<String> {
        self.id.as_ref().map(ToString::to_string)
    }
}

/// Ordered records plus an id index, replaced wholesale on every fetch.
#[derive(Debug, Clone)]
pub struct RecordRegistry<R> {
    records: Vec<R>,
    index: HashMap<String, usize>,
}

impl<R> Default for RecordRegistry<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<R> RecordRegistry<R> {
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R: Keyed> RecordRegistry<R> {
    pub fn replace(&mut self, records: Vec<R>) {
        self.index = records
            .iter()
            .enumerate()
            .filter_map(|(position, record)| record.key().map(|key| (key, position)))
            .collect();
        self.records = records;
    }

    pub fn get(&self, key: &str) -> Option<&R> {
        self.index
            .get(key.trim())
            .and_then(|&position| self.records.get(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RecordId;

    fn reflection(id: Option<i64>, title: &str) -> Reflection {
        Reflection {
            id: id.map(RecordId::new),
            title: title.to_string(),
            ..Reflection::default()
        }
    }

    #[test]
    fn looks_up_by_display_id() {
        let mut registry = RecordRegistry::default();
        registry.replace(vec![reflection(Some(3), "Rain"), reflection(Some(9), "Chai")]);

        assert_eq!(registry.get("9").map(|r| r.title.as_str()), Some("Chai"));
        assert_eq!(registry.get(" 3 ").map(|r| r.title.as_str()), Some("Rain"));
        assert!(registry.get("4").is_none());
    }

    #[test]
    fn records_without_ids_are_listed_but_not_addressable() {
        let mut registry = RecordRegistry::default();
        registry.replace(vec![reflection(None, "Untitled")]);
        assert_eq!(registry.records().len(), 1);
        assert!(registry.get("").is_none());
    }

    #[test]
    fn replace_drops_stale_entries() {
        let mut registry = RecordRegistry::default();
        registry.replace(vec![reflection(Some(1), "Old")]);
        registry.replace(vec![reflection(Some(2), "New")]);
        assert!(registry.get("1").is_none());
        assert!(registry.get("2").is_some());
    }

    #[test]
    fn emptiness_follows_the_last_fetch() {
        let mut registry: RecordRegistry<Reflection> = RecordRegistry::default();
        assert!(registry.is_empty());
        registry.replace(vec![reflection(Some(1), "Rain")]);
        assert!(!registry.is_empty());
        registry.replace(Vec::new());
        assert!(registry.is_empty());
        assert!(registry.get("1").is_none());
    }

    #[test]
    fn custom_guidelines_are_keyed_by_key() {
        let mut registry = RecordRegistry::default();
        registry.replace(vec![CustomGuideline {
            key: "tone".to_string(),
            value: "gentle".to_string(),
            description: None,
        }]);
        assert_eq!(registry.get("tone").map(|g| g.value.as_str()), Some("gentle"));
    }
}
