//! `serve` command handler

use anyhow::{Context, Result};
use std::sync::Arc;

use mcp_snippets::config::AppConfig;
use mcp_snippets::mcp::{transport, Dispatcher};
use mcp_snippets::storage::{BlobStore, FsBlobStore, MemoryBlobStore};

/// Run the HTTP server until Ctrl-C
pub fn run(config: AppConfig, in_memory: bool) -> Result<()> {
    let store: Arc<dyn BlobStore> = if in_memory {
        tracing::warn!("Using in-memory storage; snippets are lost on exit");
        Arc::new(MemoryBlobStore::new())
    } else {
        let root = config.storage.resolved_root();
        tracing::info!("Storing snippets under {}", root.display());
        Arc::new(FsBlobStore::new(root))
    };

    let addr = config.bind_addr()?;
    let dispatcher = Arc::new(Dispatcher::from_config(&config, store)?);

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    rt.block_on(transport::serve_http(
        dispatcher,
        addr,
        &config.server.route,
        config.server.max_body_bytes,
        transport::ctrl_c(),
    ))
}
