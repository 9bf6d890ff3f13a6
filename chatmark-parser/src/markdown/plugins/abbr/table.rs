//! Label → expansion mapping collected from one document.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Abbreviations defined in one document.
///
/// Labels are compared exactly (case-sensitive, after unescaping). The first definition of a
/// label wins; later redefinitions in the same document are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbbreviationTable {
    entries: HashMap<String, String>,
}

impl AbbreviationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the label is already defined. Returns `true` if the entry was added.
    pub fn insert(&mut self, label: impl Into<String>, expansion: impl Into<String>) -> bool {
        let label = label.into();
        if self.entries.contains_key(&label) {
            return false;
        }
        self.entries.insert(label, expansion.into());
        true
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels sorted longest first, so a longer label is tried before any of its prefixes.
    /// Equal lengths are ordered alphabetically to keep patterns deterministic.
    pub fn labels_longest_first(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        labels.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        labels
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries sorted by label.
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort();
        entries
    }
}

impl Serialize for AbbreviationTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, expansion) in self.sorted() {
            map.serialize_entry(label, expansion)?;
        }
        map.end()
    }
}
