//! MCP (Model Context Protocol) tool endpoint
//!
//! A simplified MCP over HTTP: one route, multiplexed by method.
//!
//! - `OPTIONS` - CORS preflight, empty 200
//! - `GET` - streaming probe, answered with `data: {"ready":true}`
//! - `POST` - tool call, body `{"name": <tool>, "arguments": {...}}`
//!
//! # Usage
//!
//! ```bash
//! # Start the server
//! mcp-snippets serve
//!
//! # Save a snippet
//! curl -X POST http://127.0.0.1:7071/api/webhooks/mcp/sse \
//!   -d '{"name":"saveSnippet","arguments":{"snippetName":"x","snippet":"hi"}}'
//! ```
//!
//! # Tools
//!
//! - `getsnippets` - log and echo `triggerInput`
//! - `saveSnippet` - store `snippet` under `snippetName`
//! - `getSnippet` - read the snippet stored under `snippetName`

pub mod auth;
pub mod classify;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod response;
pub mod tools;
pub mod transport;

pub use dispatch::{Dispatcher, McpRequest};
pub use envelope::ToolInvocationEnvelope;
pub use error::DispatchError;
pub use response::{DispatchResult, McpResponse};
pub use transport::{router, serve_http};
