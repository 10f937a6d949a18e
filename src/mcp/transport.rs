//! HTTP transport for the MCP route
//!
//! A thin axum adapter: one route accepting any method, handed to the
//! [`Dispatcher`], plus a `/health` endpoint.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Json};
use axum::routing::{any, get};
use axum::Router;
use serde_json::{json, Value};
use tracing::info;

use super::dispatch::{Dispatcher, McpRequest};
use super::error::DispatchError;

/// Build the router serving `route`
pub fn router(dispatcher: Arc<Dispatcher>, route: &str, max_body_bytes: usize) -> Router {
    Router::new()
        .route(route, any(mcp_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(dispatcher)
}

async fn mcp_handler(
    State(dispatcher): State<Arc<Dispatcher>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> impl IntoResponse {
    info!("Processing MCP request: {} {}", method, uri.path());
    let (body, rejection) = match body {
        Ok(body) => (body, None),
        Err(rejection) => (Bytes::new(), Some(rejection)),
    };
    let request = McpRequest {
        method,
        uri,
        headers,
        body,
    };

    // Only a tool call reads its body; other methods proceed without it
    match rejection {
        Some(rejection) if request.method == Method::POST => {
            dispatcher.reject(&request, body_error(rejection))
        }
        _ => dispatcher.dispatch(&request).await,
    }
}

fn body_error(rejection: BytesRejection) -> DispatchError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        DispatchError::PayloadTooLarge
    } else {
        DispatchError::UnreadableBody(rejection.body_text())
    }
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "mcp-snippets",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Serve until `shutdown` resolves
pub async fn serve_http(
    dispatcher: Arc<Dispatcher>,
    addr: SocketAddr,
    route: &str,
    max_body_bytes: usize,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = router(dispatcher, route, max_body_bytes);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on http://{}{}", listener.local_addr()?, route);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C
pub async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down..."),
        Err(e) => {
            tracing::error!("Failed to listen for ctrl_c: {:?}", e);
            std::future::pending::<()>().await
        }
    }
}
