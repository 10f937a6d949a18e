//! Request classification by HTTP method

use axum::http::Method;

use super::error::DispatchError;

/// What an inbound request on the MCP route is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// CORS preflight (`OPTIONS`)
    Preflight,
    /// Event-stream connection probe (`GET`), body ignored
    StreamProbe,
    /// Tool invocation (`POST`), body carries the envelope
    ToolCall,
}

/// Methods served on the MCP route, as advertised in `Allow` and CORS headers
pub const ALLOWED_METHODS: &str = "GET,POST,OPTIONS";

pub fn classify(method: &Method) -> Result<RequestKind, DispatchError> {
    match *method {
        Method::OPTIONS => Ok(RequestKind::Preflight),
        Method::GET => Ok(RequestKind::StreamProbe),
        Method::POST => Ok(RequestKind::ToolCall),
        _ => Err(DispatchError::UnsupportedMethod(method.clone())),
    }
}
