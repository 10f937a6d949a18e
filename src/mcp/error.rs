//! Dispatch error taxonomy and its HTTP status mapping

use axum::http::{Method, StatusCode};
use thiserror::Error;

use crate::storage::{KeyError, StoreError};

/// Everything that can stop a request short of a tool payload.
///
/// Client variants are reported verbatim. Server variants carry the cause for
/// logging but only a fixed message reaches the caller.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("request body is not valid JSON")]
    MalformedJson(#[source] serde_json::Error),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("tool {tool} is missing required argument: {key}")]
    MissingArgument { tool: String, key: String },

    #[error("tool {tool} argument {key} must be a string, number or boolean")]
    InvalidArgument { tool: String, key: String },

    #[error("invalid snippet name: {0}")]
    InvalidSnippetName(#[from] KeyError),

    #[error("unsupported method: {0}")]
    UnsupportedMethod(Method),

    #[error("missing or invalid function key")]
    Unauthorized,

    #[error("request body exceeds the configured size limit")]
    PayloadTooLarge,

    #[error("request body could not be read: {0}")]
    UnreadableBody(String),

    #[error("storage failure: {0}")]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse error class used in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Client,
    Server,
}

impl DispatchError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedJson(_)
            | Self::MissingField(_)
            | Self::UnknownTool(_)
            | Self::MissingArgument { .. }
            | Self::InvalidArgument { .. }
            | Self::InvalidSnippetName(_)
            | Self::UnreadableBody(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        if self.status().is_server_error() {
            ErrorKind::Server
        } else {
            ErrorKind::Client
        }
    }

    /// Stable machine-readable code, logged alongside the message
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedJson(_) => "MALFORMED_JSON",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::UnknownTool(_) => "UNKNOWN_TOOL",
            Self::MissingArgument { .. } => "MISSING_ARGUMENT",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::InvalidSnippetName(_) => "INVALID_SNIPPET_NAME",
            Self::UnsupportedMethod(_) => "UNSUPPORTED_METHOD",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::UnreadableBody(_) => "UNREADABLE_BODY",
            Self::Store(_) => "STORAGE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to return to the caller
    pub fn public_message(&self) -> String {
        match self {
            Self::Store(_) => "storage unavailable".to_string(),
            Self::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}
