//! Function-key access control
//!
//! A deployment either runs anonymously or requires a shared key on every
//! non-preflight request, given in the `x-functions-key` header or the `code`
//! query parameter.

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::{HeaderMap, Uri};

use super::error::DispatchError;

pub const FUNCTION_KEY_HEADER: &str = "x-functions-key";
pub const FUNCTION_KEY_QUERY: &str = "code";

#[derive(Debug, Clone, Default)]
pub struct FunctionKeyGuard {
    key: Option<String>,
}

impl FunctionKeyGuard {
    pub fn new(key: Option<String>) -> Self {
        Self {
            key: key.filter(|k| !k.is_empty()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.key.is_some()
    }

    pub fn check(&self, headers: &HeaderMap, uri: &Uri) -> Result<(), DispatchError> {
        let Some(expected) = self.key.as_deref() else {
            return Ok(());
        };

        let presented = extract_function_key(headers, uri);
        match presented {
            Some(key) if constant_time_eq(key.as_bytes(), expected.as_bytes()) => Ok(()),
            _ => Err(DispatchError::Unauthorized),
        }
    }
}

/// Header first, then `?code=` (percent-decoded)
pub fn extract_function_key(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    if let Some(key) = headers
        .get(FUNCTION_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        return Some(key.to_string());
    }

    let Query(mut params) = Query::<HashMap<String, String>>::try_from_uri(uri).ok()?;
    params.remove(FUNCTION_KEY_QUERY)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[test]
    fn test_disabled_guard_allows_everything() {
        let guard = FunctionKeyGuard::new(None);
        assert!(!guard.is_enabled());
        assert!(guard.check(&HeaderMap::new(), &uri("/mcp")).is_ok());

        // An empty key is treated as unset
        assert!(!FunctionKeyGuard::new(Some(String::new())).is_enabled());
    }

    #[test]
    fn test_header_key() {
        let guard = FunctionKeyGuard::new(Some("secret".into()));
        let mut headers = HeaderMap::new();
        headers.insert(FUNCTION_KEY_HEADER, "secret".parse().unwrap());
        assert!(guard.check(&headers, &uri("/mcp")).is_ok());

        headers.insert(FUNCTION_KEY_HEADER, "wrong".parse().unwrap());
        assert!(matches!(
            guard.check(&headers, &uri("/mcp")),
            Err(DispatchError::Unauthorized)
        ));
    }

    #[test]
    fn test_query_key() {
        let guard = FunctionKeyGuard::new(Some("secret".into()));
        assert!(guard.check(&HeaderMap::new(), &uri("/mcp?x=1&code=secret")).is_ok());
        assert!(guard.check(&HeaderMap::new(), &uri("/mcp?code=nope")).is_err());
        assert!(guard.check(&HeaderMap::new(), &uri("/mcp")).is_err());
    }

    #[test]
    fn test_query_key_is_percent_decoded() {
        let guard = FunctionKeyGuard::new(Some("abc/de==".into()));
        assert!(guard
            .check(&HeaderMap::new(), &uri("/mcp?code=abc%2Fde%3D%3D"))
            .is_ok());
        assert_eq!(
            extract_function_key(&HeaderMap::new(), &uri("/mcp?code=a%2Bb&x=1")),
            Some("a+b".to_string())
        );
    }

    #[test]
    fn test_extract_prefers_header() {
        let mut headers = HeaderMap::new();
        headers.insert(FUNCTION_KEY_HEADER, "from-header".parse().unwrap());
        assert_eq!(
            extract_function_key(&headers, &uri("/mcp?code=from-query")),
            Some("from-header".to_string())
        );
    }
}
