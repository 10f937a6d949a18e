//! Request dispatcher
//!
//! `Dispatcher::dispatch` is the whole request lifecycle with no transport
//! attached: classify the method, check the function key, parse the
//! envelope, bind arguments, run the tool, render the response. The axum
//! adapter in `transport` only converts to and from [`McpRequest`] /
//! [`McpResponse`].

use std::sync::Arc;

use anyhow::Result;
use axum::body::Bytes;
use axum::http::{HeaderMap, Method, Uri};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::auth::FunctionKeyGuard;
use super::classify::{classify, RequestKind};
use super::envelope::ToolInvocationEnvelope;
use super::error::{DispatchError, ErrorKind};
use super::response::{DispatchResult, McpResponse, ResponseBuilder};
use super::tools::{ToolArguments, ToolContext, ToolRegistry};
use crate::config::AppConfig;
use crate::storage::BlobStore;

/// An inbound request on the MCP route
#[derive(Debug, Clone)]
pub struct McpRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl McpRequest {
    pub fn new(method: Method, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            uri: Uri::from_static("/"),
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// Stateless per request; everything it holds is read-only after startup
pub struct Dispatcher {
    registry: ToolRegistry,
    ctx: ToolContext,
    guard: FunctionKeyGuard,
    responses: ResponseBuilder,
}

impl Dispatcher {
    pub fn new(
        registry: ToolRegistry,
        store: Arc<dyn BlobStore>,
        guard: FunctionKeyGuard,
        responses: ResponseBuilder,
    ) -> Self {
        Self {
            registry,
            ctx: ToolContext { store },
            guard,
            responses,
        }
    }

    /// Dispatcher with the built-in tools, configured from `config`
    pub fn from_config(config: &AppConfig, store: Arc<dyn BlobStore>) -> Result<Self> {
        let responses = ResponseBuilder::new(config.server.response_mode, &config.cors)?;
        let guard = FunctionKeyGuard::new(config.auth.function_key.clone());
        let registry = ToolRegistry::builtin();
        info!(
            "Dispatcher ready: {} tools, {} store, {} responses, {} access",
            registry.len(),
            store.name(),
            responses.mode(),
            if guard.is_enabled() { "function-key" } else { "anonymous" }
        );
        Ok(Self::new(registry, store, guard, responses))
    }

    pub async fn dispatch(&self, request: &McpRequest) -> McpResponse {
        let result = self.route(request).await;
        self.finish(request, result)
    }

    /// Answer a request whose body the transport could not take, with the
    /// same CORS headers and error shape as any other failure
    pub fn reject(&self, request: &McpRequest, err: DispatchError) -> McpResponse {
        self.finish(request, DispatchResult::ToolError(err))
    }

    fn finish(&self, request: &McpRequest, result: DispatchResult) -> McpResponse {
        if let DispatchResult::ToolError(ref err) = result {
            match err.kind() {
                ErrorKind::Client => warn!(
                    code = err.error_code(),
                    "{} {} rejected: {}",
                    request.method,
                    request.uri.path(),
                    err
                ),
                ErrorKind::Server => error!(
                    code = err.error_code(),
                    "{} {} failed: {}",
                    request.method,
                    request.uri.path(),
                    err
                ),
            }
        }

        self.responses.build(result)
    }

    async fn route(&self, request: &McpRequest) -> DispatchResult {
        let kind = match classify(&request.method) {
            Ok(kind) => kind,
            Err(e) => return DispatchResult::ToolError(e),
        };

        match kind {
            RequestKind::Preflight => DispatchResult::CorsPreflightOk,
            RequestKind::StreamProbe => match self.guard.check(&request.headers, &request.uri) {
                Ok(()) => {
                    info!("Establishing SSE connection");
                    DispatchResult::StreamReady
                }
                Err(e) => DispatchResult::ToolError(e),
            },
            RequestKind::ToolCall => {
                if let Err(e) = self.guard.check(&request.headers, &request.uri) {
                    return DispatchResult::ToolError(e);
                }
                debug!("Request body: {}", String::from_utf8_lossy(&request.body));
                match self.call_body(&request.body).await {
                    Ok(payload) => DispatchResult::ToolSuccess { payload },
                    Err(e) => DispatchResult::ToolError(e),
                }
            }
        }
    }

    async fn call_body(&self, body: &[u8]) -> Result<Value, DispatchError> {
        let envelope = ToolInvocationEnvelope::parse(body)?;
        self.invoke(&envelope).await
    }

    /// Run one tool call; shared by the HTTP route and `mcp-snippets call`
    pub async fn invoke(&self, envelope: &ToolInvocationEnvelope) -> Result<Value, DispatchError> {
        let tool = self
            .registry
            .get(&envelope.name)
            .ok_or_else(|| DispatchError::UnknownTool(envelope.name.clone()))?;

        let args = ToolArguments::bind(tool.definition(), &envelope.arguments)?;

        info!("MCP Tool: {}", envelope.name);
        tool.call(&self.ctx, &args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CorsConfig, ResponseMode};
    use crate::storage::MemoryBlobStore;
    use axum::http::StatusCode;
    use serde_json::json;

    fn dispatcher(mode: ResponseMode, key: Option<&str>) -> Dispatcher {
        Dispatcher::new(
            ToolRegistry::builtin(),
            Arc::new(MemoryBlobStore::new()),
            FunctionKeyGuard::new(key.map(String::from)),
            ResponseBuilder::new(mode, &CorsConfig::default()).unwrap(),
        )
    }

    fn post(body: &str) -> McpRequest {
        McpRequest::new(Method::POST, body.to_string())
    }

    fn json_body(response: &McpResponse) -> Value {
        serde_json::from_str(&response.body).unwrap()
    }

    #[tokio::test]
    async fn test_preflight_ignores_body() {
        let d = dispatcher(ResponseMode::Sse, Some("secret"));
        let response = d
            .dispatch(&McpRequest::new(Method::OPTIONS, "garbage {"))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn test_get_returns_ready_frame() {
        let d = dispatcher(ResponseMode::Json, None);
        let response = d.dispatch(&McpRequest::new(Method::GET, "ignored")).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, "data: {\"ready\":true}\n\n");
    }

    #[tokio::test]
    async fn test_echo_tool_over_sse() {
        let d = dispatcher(ResponseMode::Sse, None);
        let response = d
            .dispatch(&post(
                r#"{"name":"getsnippets","arguments":{"triggerInput":"Hello, World!"}}"#,
            ))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, "data: {\"content\":\"Hello, World!\"}\n\n");
    }

    #[tokio::test]
    async fn test_save_then_get_round_trip() {
        let d = dispatcher(ResponseMode::Json, None);
        let saved = d
            .dispatch(&post(
                r#"{"name":"saveSnippet","arguments":{"snippetName":"x","snippet":"hi"}}"#,
            ))
            .await;
        assert_eq!(saved.status, StatusCode::OK);
        assert_eq!(
            json_body(&saved),
            json!({"success": true, "message": "Snippet saved successfully"})
        );

        let got = d
            .dispatch(&post(r#"{"name":"getSnippet","arguments":{"snippetName":"x"}}"#))
            .await;
        assert_eq!(json_body(&got), json!({"success": true, "snippet": "hi"}));
    }

    #[tokio::test]
    async fn test_client_errors() {
        let d = dispatcher(ResponseMode::Json, None);
        let cases = [
            ("{oops", "request body is not valid JSON"),
            (r#"{"arguments":{}}"#, "missing required field: name"),
            (r#"{"name":"getSnippet"}"#, "missing required field: arguments"),
            (r#"{"name":"Echo","arguments":{}}"#, "unknown tool: Echo"),
            (
                r#"{"name":"saveSnippet","arguments":{"snippetName":"x"}}"#,
                "tool saveSnippet is missing required argument: snippet",
            ),
        ];
        for (body, message) in cases {
            let response = d.dispatch(&post(body)).await;
            assert_eq!(response.status, StatusCode::BAD_REQUEST, "body {}", body);
            assert_eq!(json_body(&response), json!({ "error": message }));
        }
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let d = dispatcher(ResponseMode::Sse, None);
        let response = d.dispatch(&McpRequest::new(Method::PUT, "")).await;
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_function_key_required_when_configured() {
        let d = dispatcher(ResponseMode::Json, Some("secret"));
        let body = r#"{"name":"getsnippets","arguments":{"triggerInput":"a"}}"#;

        let response = d.dispatch(&post(body)).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);

        let probe = d.dispatch(&McpRequest::new(Method::GET, "")).await;
        assert_eq!(probe.status, StatusCode::UNAUTHORIZED);

        let mut request = post(body);
        request.headers.insert("x-functions-key", "secret".parse().unwrap());
        let response = d.dispatch(&request).await;
        assert_eq!(response.status, StatusCode::OK);
    }

    #[test]
    fn test_reject_uses_error_shape_and_cors() {
        let d = dispatcher(ResponseMode::Sse, None);
        let response = d.reject(
            &McpRequest::new(Method::POST, ""),
            DispatchError::PayloadTooLarge,
        );
        assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.content_type(), Some("application/json"));
        assert_eq!(
            response.header_str("access-control-allow-origin"),
            Some("*")
        );
        assert_eq!(
            json_body(&response),
            json!({"error": "request body exceeds the configured size limit"})
        );
    }

    #[tokio::test]
    async fn test_invoke_directly() {
        let d = dispatcher(ResponseMode::Sse, None);
        let envelope = ToolInvocationEnvelope {
            name: "getSnippet".into(),
            arguments: json!({"snippetName": "missing"}).as_object().cloned().unwrap(),
        };
        let payload = d.invoke(&envelope).await.unwrap();
        assert_eq!(payload["success"], false);
    }
}
