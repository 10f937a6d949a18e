//! Application configuration
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. User config (~/.config/mcp-snippets/config.toml)
//! 3. Project config (./mcp-snippets.toml, or an explicit `--config` path)
//! 4. Environment variables
//!
//! Files are merged table by table, so a project file only needs the keys it
//! changes. CLI flags are applied on top by the caller.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::storage::FsBlobStore;

pub const PROJECT_CONFIG_FILE: &str = "mcp-snippets.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
    /// Path of the MCP route
    pub route: String,
    /// Largest accepted request body
    pub max_body_bytes: usize,
    /// How tool results are framed
    pub response_mode: ResponseMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:7071".to_string(),
            route: "/api/webhooks/mcp/sse".to_string(),
            max_body_bytes: 1024 * 1024,
            response_mode: ResponseMode::default(),
        }
    }
}

/// Framing for successful tool results, fixed per deployment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// `text/event-stream` with a single `data:` frame
    #[default]
    Sse,
    /// Plain `application/json`
    Json,
}

impl FromStr for ResponseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sse" => Ok(Self::Sse),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown response mode '{}', expected sse or json", other)),
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sse => write!(f, "sse"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Attach `Access-Control-Allow-Origin: *` to every response
    pub enabled: bool,
    /// Advertised in `Access-Control-Allow-Headers` on preflight
    pub allowed_headers: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_headers: vec![
                "Content-Type".to_string(),
                "Authorization".to_string(),
                "x-functions-key".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Blob root directory (default: platform data dir)
    pub root: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolved_root(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(FsBlobStore::default_root)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared key required on GET/POST when set; anonymous access otherwise
    pub function_key: Option<String>,
}

impl AppConfig {
    /// Load config from all sources.
    ///
    /// `explicit` replaces the project file lookup and must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut merged = toml::Table::new();

        if let Some(user_path) = Self::user_config_path().filter(|p| p.exists()) {
            merge_tables(&mut merged, read_table(&user_path)?);
        }

        match explicit {
            Some(path) => merge_tables(&mut merged, read_table(path)?),
            None => {
                let project = Path::new(PROJECT_CONFIG_FILE);
                if project.exists() {
                    merge_tables(&mut merged, read_table(project)?);
                }
            }
        }

        let mut config: AppConfig = toml::Value::Table(merged)
            .try_into()
            .context("Invalid configuration")?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("mcp-snippets").join("config.toml"))
    }

    /// Environment variables override file values
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(bind) = var("MCP_SNIPPETS_BIND") {
            self.server.bind = bind;
        }
        if let Some(route) = var("MCP_SNIPPETS_ROUTE") {
            self.server.route = route;
        }
        if let Some(mode) = var("MCP_SNIPPETS_RESPONSE_MODE") {
            self.server.response_mode = mode
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("MCP_SNIPPETS_RESPONSE_MODE")?;
        }
        if let Some(root) = var("MCP_SNIPPETS_STORAGE_ROOT") {
            self.storage.root = Some(PathBuf::from(root));
        }
        if let Some(key) = var("MCP_SNIPPETS_FUNCTION_KEY") {
            self.auth.function_key = Some(key).filter(|k| !k.is_empty());
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;
        if !self.server.route.starts_with('/') {
            anyhow::bail!("server.route must start with '/': {}", self.server.route);
        }
        if self.server.route == "/health" {
            anyhow::bail!("server.route cannot be /health");
        }
        if self.server.max_body_bytes == 0 {
            anyhow::bail!("server.max_body_bytes must be greater than 0");
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .with_context(|| format!("Invalid bind address: {}", self.server.bind))
    }

    /// TOML rendering with the function key masked
    pub fn to_redacted_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.auth.function_key.is_some() {
            shown.auth.function_key = Some("********".to_string());
        }
        toml::to_string_pretty(&shown).context("Failed to render configuration")
    }

    /// Write an example project config, refusing to overwrite an existing one
    pub fn init_project_config(dir: &Path) -> Result<PathBuf> {
        let path = dir.join(PROJECT_CONFIG_FILE);
        if path.exists() {
            anyhow::bail!("{} already exists", path.display());
        }

        let example = r#"# mcp-snippets configuration

[server]
# bind = "127.0.0.1:7071"
# route = "/api/webhooks/mcp/sse"
# max_body_bytes = 1048576
# Tool results framed as server-sent events ("sse") or plain JSON ("json")
# response_mode = "sse"

[cors]
# enabled = true
# allowed_headers = ["Content-Type", "Authorization", "x-functions-key"]

[storage]
# root = "/var/lib/mcp-snippets/blobs"

[auth]
# Require this key in the x-functions-key header or ?code= query parameter
# function_key = "change-me"
"#;
        std::fs::write(&path, example)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

fn read_table(path: &Path) -> Result<toml::Table> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Deep-merge `other` into `base`; `other` wins on conflicts
fn merge_tables(base: &mut toml::Table, other: toml::Table) {
    for (key, value) in other {
        match value {
            toml::Value::Table(incoming) => {
                if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                    merge_tables(existing, incoming);
                    continue;
                }
                base.insert(key, toml::Value::Table(incoming));
            }
            other => {
                base.insert(key, other);
            }
        }
    }
}
