//! mcp-snippets - a tool-invocation endpoint speaking a simplified MCP over HTTP
//!
//! Exposes three tools (a hello/echo tool and save/get snippet tools) on a
//! single method-multiplexed route, with snippets persisted to a blob store.

pub mod config;
pub mod mcp;
pub mod storage;
