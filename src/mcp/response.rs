//! Dispatch outcomes and their HTTP rendering

use anyhow::{Context, Result};
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

use super::classify::ALLOWED_METHODS;
use super::error::DispatchError;
use crate::config::{CorsConfig, ResponseMode};

/// Body of the answer to a streaming probe
pub const READY_FRAME: &str = "data: {\"ready\":true}\n\n";

const EVENT_STREAM: &str = "text/event-stream";
const APPLICATION_JSON: &str = "application/json";

/// Outcome of one request on the MCP route
#[derive(Debug)]
pub enum DispatchResult {
    CorsPreflightOk,
    StreamReady,
    ToolSuccess { payload: Value },
    ToolError(DispatchError),
}

/// Transport-neutral response: status, headers, text body
#[derive(Debug, Clone)]
pub struct McpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl McpResponse {
    fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: String::new(),
        }
    }

    fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    fn body(mut self, body: String) -> Self {
        self.body = body;
        self
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl IntoResponse for McpResponse {
    fn into_response(self) -> Response {
        (self.status, self.headers, self.body).into_response()
    }
}

/// Renders [`DispatchResult`]s for one deployment's framing and CORS settings
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    mode: ResponseMode,
    cors_enabled: bool,
    allowed_headers: HeaderValue,
}

impl ResponseBuilder {
    pub fn new(mode: ResponseMode, cors: &CorsConfig) -> Result<Self> {
        let allowed_headers = HeaderValue::from_str(&cors.allowed_headers.join(", "))
            .context("cors.allowed_headers contains characters not allowed in a header")?;
        Ok(Self {
            mode,
            cors_enabled: cors.enabled,
            allowed_headers,
        })
    }

    pub fn mode(&self) -> ResponseMode {
        self.mode
    }

    pub fn build(&self, result: DispatchResult) -> McpResponse {
        let response = match result {
            DispatchResult::CorsPreflightOk => McpResponse::new(StatusCode::OK)
                .header(
                    header::ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static(ALLOWED_METHODS),
                )
                .header(
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    self.allowed_headers.clone(),
                )
                // Preflights always advertise the origin, CORS toggle or not
                .header(
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ),

            DispatchResult::StreamReady => McpResponse::new(StatusCode::OK)
                .header(header::CONTENT_TYPE, HeaderValue::from_static(EVENT_STREAM))
                .header(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"))
                .header(header::CONNECTION, HeaderValue::from_static("keep-alive"))
                .body(READY_FRAME.to_string()),

            DispatchResult::ToolSuccess { payload } => match self.mode {
                ResponseMode::Sse => McpResponse::new(StatusCode::OK)
                    .header(header::CONTENT_TYPE, HeaderValue::from_static(EVENT_STREAM))
                    .header(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"))
                    .body(sse_frame(&payload)),
                ResponseMode::Json => McpResponse::new(StatusCode::OK)
                    .header(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))
                    .body(payload.to_string()),
            },

            DispatchResult::ToolError(err) => {
                let mut response = McpResponse::new(err.status())
                    .header(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))
                    .body(json!({ "error": err.public_message() }).to_string());
                if matches!(err, DispatchError::UnsupportedMethod(_)) {
                    response =
                        response.header(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
                }
                response
            }
        };

        if self.cors_enabled {
            response.header(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            )
        } else {
            response
        }
    }
}

/// One server-sent event carrying `payload`
pub fn sse_frame(payload: &Value) -> String {
    format!("data: {}\n\n", payload)
}
