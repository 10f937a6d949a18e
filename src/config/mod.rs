//! Configuration module
//!
//! This module handles:
//! - User-level configuration (~/.config/mcp-snippets/config.toml)
//! - Project-level configuration (./mcp-snippets.toml)
//! - Environment variable overrides (MCP_SNIPPETS_*)

mod app_config;

pub use app_config::{
    AppConfig,
    AuthConfig,
    CorsConfig,
    ResponseMode,
    ServerConfig,
    StorageConfig,
    PROJECT_CONFIG_FILE,
};
