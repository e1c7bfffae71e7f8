//! Insertion-ordered record index.

use indexmap::IndexMap;
use serde_json::Value;

use crate::record::{Record, RecordKind};

/// Identifier → record document, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordIndex {
    kind: RecordKind,
    entries: IndexMap<String, Value>,
}

impl RecordIndex {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            entries: IndexMap::new(),
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Insert a record, replacing any earlier record with the same id.
    ///
    /// A replaced entry keeps its original position. Returns the
    /// previous document when one was overwritten.
    pub fn insert(&mut self, record: Record) -> Option<Value> {
        self.entries.insert(record.id, record.data)
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Pretty JSON object, two-space indent, non-ASCII kept as-is.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn record(id: &str, data: Value) -> Record {
        Record {
            id: id.to_string(),
            source: PathBuf::from(format!("{id}.json")),
            data,
        }
    }

    #[test]
    fn keeps_insertion_order() {
        let mut index = RecordIndex::new(RecordKind::Animation);
        index.insert(record("zeta", json!({})));
        index.insert(record("alpha", json!({})));
        index.insert(record("mid", json!({})));
        assert_eq!(index.ids().collect::<Vec<_>>(), ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn later_insert_overwrites_in_place() {
        let mut index = RecordIndex::new(RecordKind::Vfx);
        assert_eq!(index.kind(), RecordKind::Vfx);
        index.insert(record("a", json!({ "v": 1 })));
        index.insert(record("b", json!({ "v": 2 })));
        let previous = index.insert(record("a", json!({ "v": 3 })));

        assert_eq!(previous, Some(json!({ "v": 1 })));
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("a"), Some(&json!({ "v": 3 })));
        assert_eq!(index.ids().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn empty_index_renders_empty_object() {
        let index = RecordIndex::new(RecordKind::Vfx);
        assert!(index.is_empty());
        assert_eq!(index.to_json_pretty().unwrap(), "{}");
    }

    #[test]
    fn pretty_json_preserves_key_order_and_unicode() {
        let mut index = RecordIndex::new(RecordKind::Animation);
        let data: Value =
            serde_json::from_str(r#"{"name":"강타","frames":4,"delay":80}"#).unwrap();
        index.insert(record("smash", data));

        let rendered = index.to_json_pretty().unwrap();
        assert_eq!(
            rendered,
            "{\n  \"smash\": {\n    \"name\": \"강타\",\n    \"frames\": 4,\n    \"delay\": 80\n  }\n}"
        );
    }
}
