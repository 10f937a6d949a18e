//! `call` command handler: one tool invocation without the HTTP layer

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::sync::Arc;

use mcp_snippets::config::AppConfig;
use mcp_snippets::mcp::{Dispatcher, ToolInvocationEnvelope};
use mcp_snippets::storage::FsBlobStore;

pub fn run(config: &AppConfig, tool: String, args: Vec<(String, String)>) -> Result<()> {
    let arguments: Map<String, Value> = args
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();
    let envelope = ToolInvocationEnvelope {
        name: tool,
        arguments,
    };

    let store = Arc::new(FsBlobStore::new(config.storage.resolved_root()));
    let dispatcher = Dispatcher::from_config(config, store)?;

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    match rt.block_on(dispatcher.invoke(&envelope)) {
        Ok(payload) => {
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(())
        }
        Err(e) => anyhow::bail!("{} ({})", e.public_message(), e.error_code()),
    }
}
