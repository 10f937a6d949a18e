//! Blob keys and snippet-name validation

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Container that holds every snippet blob
pub const SNIPPET_CONTAINER: &str = "snippets";

const MAX_NAME_LEN: usize = 128;

/// Why a snippet name was refused as a storage key
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("snippet name is empty")]
    Empty,

    #[error("snippet name exceeds 128 characters")]
    TooLong,

    #[error("snippet name contains a path traversal sequence")]
    Traversal,

    #[error("snippet name contains invalid character {0:?}")]
    InvalidChar(char),
}

/// A validated `container/blob` pair.
///
/// Only constructible through [`BlobKey::snippet`], so every key that reaches
/// a store is a single safe path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobKey {
    container: &'static str,
    blob: String,
}

impl BlobKey {
    /// Key for the snippet called `name`, stored as `snippets/<name>.json`
    pub fn snippet(name: &str) -> Result<Self, KeyError> {
        validate_snippet_name(name)?;
        Ok(Self {
            container: SNIPPET_CONTAINER,
            blob: format!("{}.json", name),
        })
    }

    pub fn container(&self) -> &str {
        self.container
    }

    pub fn blob(&self) -> &str {
        &self.blob
    }

    /// Path of this blob relative to a store root
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(self.container).join(&self.blob)
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.container, self.blob)
    }
}

/// Accept `[A-Za-z0-9._-]{1,128}` with no leading dot and no `..`
fn validate_snippet_name(name: &str) -> Result<(), KeyError> {
    if name.is_empty() {
        return Err(KeyError::Empty);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(KeyError::TooLong);
    }
    if name.starts_with('.') || name.contains("..") {
        return Err(KeyError::Traversal);
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(KeyError::InvalidChar(c));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_key_layout() {
        let key = BlobKey::snippet("myTestSnippet").unwrap();
        assert_eq!(key.container(), "snippets");
        assert_eq!(key.blob(), "myTestSnippet.json");
        assert_eq!(key.to_string(), "snippets/myTestSnippet.json");
        assert_eq!(
            key.relative_path(),
            PathBuf::from("snippets").join("myTestSnippet.json")
        );
    }

    #[test]
    fn test_accepts_dots_dashes_underscores() {
        assert!(BlobKey::snippet("build-script_v1.2").is_ok());
    }

    #[test]
    fn test_rejects_traversal() {
        assert_eq!(BlobKey::snippet("../secret"), Err(KeyError::Traversal));
        assert_eq!(BlobKey::snippet("a..b"), Err(KeyError::Traversal));
        assert_eq!(BlobKey::snippet(".hidden"), Err(KeyError::Traversal));
    }

    #[test]
    fn test_rejects_separators() {
        assert_eq!(BlobKey::snippet("a/b"), Err(KeyError::InvalidChar('/')));
        assert_eq!(BlobKey::snippet("a\\b"), Err(KeyError::InvalidChar('\\')));
        assert_eq!(BlobKey::snippet("a b"), Err(KeyError::InvalidChar(' ')));
    }

    #[test]
    fn test_rejects_empty_and_long() {
        assert_eq!(BlobKey::snippet(""), Err(KeyError::Empty));
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert_eq!(BlobKey::snippet(&long), Err(KeyError::TooLong));
        assert!(BlobKey::snippet(&"x".repeat(MAX_NAME_LEN)).is_ok());
    }
}
