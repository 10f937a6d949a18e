//! Tool invocation envelope: `{"name": <tool>, "arguments": {...}}`

use serde_json::{Map, Value};

use super::error::DispatchError;

/// A validated tool call
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocationEnvelope {
    pub name: String,
    pub arguments: Map<String, Value>,
}

impl ToolInvocationEnvelope {
    /// Parse a POST body.
    ///
    /// Anything that is not JSON (the empty body included) is `MalformedJson`.
    /// Otherwise `name` then `arguments` are checked in that order, and the
    /// first one that is absent or of the wrong type is reported as
    /// `MissingField`. A non-object document is missing both.
    pub fn parse(body: &[u8]) -> Result<Self, DispatchError> {
        let value: Value = serde_json::from_slice(body).map_err(DispatchError::MalformedJson)?;

        let name = value
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or(DispatchError::MissingField("name"))?;

        let arguments = value
            .get("arguments")
            .and_then(Value::as_object)
            .ok_or(DispatchError::MissingField("arguments"))?;

        Ok(Self {
            name: name.to_string(),
            arguments: arguments.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_field(body: &str) -> &'static str {
        match ToolInvocationEnvelope::parse(body.as_bytes()) {
            Err(DispatchError::MissingField(f)) => f,
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_envelope() {
        let env = ToolInvocationEnvelope::parse(
            br#"{"name":"getSnippet","arguments":{"snippetName":"x"}}"#,
        )
        .unwrap();
        assert_eq!(env.name, "getSnippet");
        assert_eq!(env.arguments.get("snippetName"), Some(&Value::from("x")));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let env =
            ToolInvocationEnvelope::parse(br#"{"name":"t","arguments":{},"id":7}"#).unwrap();
        assert!(env.arguments.is_empty());
    }

    #[test]
    fn test_malformed_json() {
        for body in ["", "{", "not json", "{\"name\": }"] {
            let err = ToolInvocationEnvelope::parse(body.as_bytes()).unwrap_err();
            assert!(matches!(err, DispatchError::MalformedJson(_)), "body {:?}", body);
        }
    }

    #[test]
    fn test_name_checked_before_arguments() {
        assert_eq!(missing_field("{}"), "name");
        assert_eq!(missing_field(r#"{"arguments":{}}"#), "name");
        assert_eq!(missing_field(r#"{"name":"t"}"#), "arguments");
    }

    #[test]
    fn test_wrong_types_count_as_missing() {
        assert_eq!(missing_field(r#"{"name":5,"arguments":{}}"#), "name");
        assert_eq!(missing_field(r#"{"name":"","arguments":{}}"#), "name");
        assert_eq!(missing_field(r#"{"name":"t","arguments":"x"}"#), "arguments");
        assert_eq!(missing_field(r#"{"name":"t","arguments":[1]}"#), "arguments");
        assert_eq!(missing_field("[1,2]"), "name");
        assert_eq!(missing_field("\"hello\""), "name");
    }
}
