//! Per-scan symbol table

use serde::Serialize;
use std::collections::HashMap;

/// 1-based identifier id, stable for the lifetime of one scan
pub type SymbolId = usize;

/// Identifier text to id, in first-seen order. Lookup is case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolTable {
    names: Vec<String>,
    #[serde(skip)]
    ids: HashMap<String, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the existing id for `text` or assign the next one
    pub fn intern(&mut self, text: &str) -> SymbolId {
        if let Some(&id) = self.ids.get(text) {
            return id;
        }

        self.names.push(text.to_string());
        let id = self.names.len();
        self.ids.insert(text.to_string(), id);
        id
    }

    pub fn get(&self, text: &str) -> Option<SymbolId> {
        self.ids.get(text).copied()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.ids.contains_key(text)
    }

    pub fn name(&self, id: SymbolId) -> Option<&str> {
        id.checked_sub(1)
            .and_then(|index| self.names.get(index))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Entries in id order
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(index, name)| (index + 1, name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_first_seen_from_one() {
        let mut table = SymbolTable::new();
        assert_eq!(table.intern("foo"), 1);
        assert_eq!(table.intern("bar"), 2);
        assert_eq!(table.intern("foo"), 1);
        assert_eq!(table.len(), 2);

        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, vec![(1, "foo"), (2, "bar")]);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mut table = SymbolTable::new();
        table.intern("Foo");
        assert!(table.contains("Foo"));
        assert_eq!(table.get("foo"), None);
    }

    #[test]
    fn test_name_lookup() {
        let mut table = SymbolTable::new();
        table.intern("alpha");
        assert_eq!(table.name(1), Some("alpha"));
        assert_eq!(table.name(0), None);
        assert_eq!(table.name(2), None);
    }
}
