//! Parsing of user-typed query and edit text into structured values.
//!
//! Input is parsed leniently as JSON5 (unquoted keys, single quotes,
//! trailing commas), matching what people actually type into a filter
//! prompt. Bare words that are not valid JSON5 become string literals, so
//! `hello` edits a field to `"hello"` without ceremony.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid value: {0}")]
    Value(String),

    #[error("filter must be an object, e.g. {{name: \"x\"}}")]
    FilterNotObject,
}

/// Parse edit text into a value. Never fails for plain words: anything that
/// is not valid JSON5 is taken as a string literal.
pub fn parse_value(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    json5::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}

/// Parse filter text into a query object. Empty input means "match all".
pub fn parse_filter(text: &str) -> Result<Value, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    let value: Value =
        json5::from_str(trimmed).map_err(|e| ParseError::Value(e.to_string()))?;
    if !value.is_object() {
        return Err(ParseError::FilterNotObject);
    }
    Ok(value)
}

/// Parse insert text into a document. Must be an object.
pub fn parse_document(text: &str) -> Result<Value, ParseError> {
    let value: Value =
        json5::from_str(text.trim()).map_err(|e| ParseError::Value(e.to_string()))?;
    if !value.is_object() {
        return Err(ParseError::Value("a document must be an object".into()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_value_accepts_json5() {
        assert_eq!(parse_value("{a: 1, b: 'x'}"), json!({"a": 1, "b": "x"}));
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value("true"), json!(true));
        assert_eq!(parse_value("[1, 2,]"), json!([1, 2]));
    }

    #[test]
    fn test_parse_value_falls_back_to_string() {
        assert_eq!(parse_value("hello world"), json!("hello world"));
    }

    #[test]
    fn test_parse_value_empty_is_null() {
        assert_eq!(parse_value("   "), json!(null));
    }

    #[test]
    fn test_parse_filter_empty_matches_all() {
        assert_eq!(parse_filter("").unwrap(), json!({}));
        assert_eq!(parse_filter("  ").unwrap(), json!({}));
    }

    #[test]
    fn test_parse_filter_rejects_non_objects() {
        assert!(matches!(parse_filter("[1]"), Err(ParseError::FilterNotObject)));
        assert!(matches!(parse_filter("not json"), Err(ParseError::Value(_))));
    }

    #[test]
    fn test_parse_document_requires_object() {
        assert_eq!(parse_document("{name: 'a'}").unwrap(), json!({"name": "a"}));
        assert!(parse_document("5").is_err());
    }
}
