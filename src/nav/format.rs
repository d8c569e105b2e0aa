//! Formatting policy: how a resolved value becomes column entries.
//!
//! A single match over the value variant, shared by vertical-move
//! re-derivation, shifts, and mutation propagation so every path through
//! the engine renders a level identically.

use serde_json::Value;

use super::ColumnEntry;

/// Render a value for display in a column row. Compact JSON, so strings
/// keep their quotes and nested containers stay on one line.
pub fn display_value(value: &Value) -> String {
    value.to_string()
}

/// Entries for a column showing the children of `value`.
///
/// Arrays list their elements index-keyed; non-empty objects list their
/// fields key-keyed in insertion order. Everything else — scalars, `null`,
/// empty containers — becomes a single synthetic entry holding the literal
/// value, so a column derived from a non-empty parent is never empty and
/// its highlighted index is always valid.
pub fn column_entries(value: &Value) -> Vec<ColumnEntry> {
    match value {
        Value::Array(items) if !items.is_empty() => items
            .iter()
            .enumerate()
            .map(|(i, item)| ColumnEntry::new(i, display_value(item)))
            .collect(),
        Value::Object(map) if !map.is_empty() => map
            .iter()
            .map(|(key, item)| {
                ColumnEntry::new(key.as_str(), format!("{key}: {}", display_value(item)))
            })
            .collect(),
        leaf => vec![ColumnEntry::new(0usize, display_value(leaf))],
    }
}

/// Entries for the document-root column. Unlike [`column_entries`], an
/// empty document set yields an empty column rather than a synthetic leaf.
pub fn document_entries(docs: &[Value]) -> Vec<ColumnEntry> {
    docs.iter()
        .enumerate()
        .map(|(i, doc)| ColumnEntry::new(i, display_value(doc)))
        .collect()
}

/// Entries for the database and collection name lists.
pub fn name_entries(names: &[String]) -> Vec<ColumnEntry> {
    names
        .iter()
        .map(|name| ColumnEntry::new(name.as_str(), name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::nav::Seg;

    #[test]
    fn test_array_entries_are_index_keyed() {
        let entries = column_entries(&json!(["a", {"x": 1}]));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].seg, Seg::Index(0));
        assert_eq!(entries[0].text, "\"a\"");
        assert_eq!(entries[1].seg, Seg::Index(1));
        assert_eq!(entries[1].text, "{\"x\":1}");
    }

    #[test]
    fn test_object_entries_keep_insertion_order() {
        let entries = column_entries(&json!({"b": 1, "a": [2]}));
        assert_eq!(entries[0].seg, Seg::from("b"));
        assert_eq!(entries[0].text, "b: 1");
        assert_eq!(entries[1].seg, Seg::from("a"));
        assert_eq!(entries[1].text, "a: [2]");
    }

    #[test]
    fn test_leaves_become_a_single_synthetic_entry() {
        for value in [json!(5), json!("s"), json!(null), json!([]), json!({})] {
            let entries = column_entries(&value);
            assert_eq!(entries.len(), 1, "value {value}");
            assert_eq!(entries[0].seg, Seg::Index(0));
        }
        assert_eq!(column_entries(&json!(null))[0].text, "null");
        assert_eq!(column_entries(&json!({}))[0].text, "{}");
    }

    #[test]
    fn test_document_entries_allow_an_empty_column() {
        assert!(document_entries(&[]).is_empty());
        let entries = document_entries(&[json!({"_id": 1})]);
        assert_eq!(entries[0].seg, Seg::Index(0));
        assert_eq!(entries[0].text, "{\"_id\":1}");
    }
}
