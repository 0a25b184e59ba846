//! Lenient JSON parsing for diagnostic reports.

use serde::Serialize;
use serde_json::Value;

/// A body as it appears in error metadata: the parsed document when the text
/// is valid JSON, otherwise the original string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParsedBody {
    Parsed(Value),
    Raw(String),
}

impl ParsedBody {
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(value) => ParsedBody::Parsed(value),
            Err(_) => ParsedBody::Raw(text.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn valid_json_is_parsed() {
        let body = ParsedBody::parse(r#"{"id": 1, "name": "Test"}"#);
        assert_eq!(body, ParsedBody::Parsed(json!({"id": 1, "name": "Test"})));
    }

    #[test]
    fn invalid_json_is_kept_raw() {
        let text = r#"{id: 1, name: "Test"}"#;
        assert_eq!(ParsedBody::parse(text), ParsedBody::Raw(text.to_string()));
    }

    #[test]
    fn empty_text_is_kept_raw() {
        assert_eq!(ParsedBody::parse(""), ParsedBody::Raw(String::new()));
    }

    #[test]
    fn serializes_without_a_tag() {
        let parsed = serde_json::to_value(ParsedBody::parse("[1,2]")).unwrap();
        assert_eq!(parsed, json!([1, 2]));
        let raw = serde_json::to_value(ParsedBody::parse("a=1")).unwrap();
        assert_eq!(raw, json!("a=1"));
    }
}
