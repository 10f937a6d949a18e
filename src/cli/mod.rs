//! CLI command definitions and handlers

mod call;
mod serve;
mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mcp_snippets::config::{AppConfig, ResponseMode};

/// Parse a `key=value` tool argument
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("'{}' is not in key=value form", s))?;
    if key.is_empty() {
        return Err(format!("'{}' has an empty key", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// mcp-snippets - simplified MCP tool endpoint
#[derive(Parser, Debug)]
#[command(name = "mcp-snippets")]
#[command(
    version,
    about = "Serve MCP tool invocations over HTTP/SSE, with snippet storage",
    after_help = "\
Examples:
  mcp-snippets serve                                 Serve on 127.0.0.1:7071
  mcp-snippets serve --in-memory --response-mode json
  mcp-snippets tools                                 List tool definitions
  mcp-snippets call saveSnippet -a snippetName=x -a snippet=hi
  mcp-snippets call getSnippet -a snippetName=x"
)]
pub struct Cli {
    /// Config file (default: ./mcp-snippets.toml if present)
    #[arg(long, global = true, env = "MCP_SNIPPETS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        default_value = "info",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Socket address to listen on
        #[arg(long)]
        bind: Option<String>,

        /// Path of the MCP route
        #[arg(long)]
        route: Option<String>,

        /// Blob storage root directory
        #[arg(long)]
        storage_root: Option<PathBuf>,

        /// Keep snippets in memory only (lost on exit)
        #[arg(long, conflicts_with = "storage_root")]
        in_memory: bool,

        /// Frame tool results as server-sent events (sse) or plain JSON (json)
        #[arg(long)]
        response_mode: Option<ResponseMode>,
    },

    /// Print the registered tool definitions as JSON
    Tools {
        /// Print MCP tools/list shape (name, description, inputSchema)
        #[arg(long)]
        schema: bool,
    },

    /// Invoke one tool locally and print its result
    Call {
        /// Tool name (e.g. getSnippet)
        tool: String,

        /// Tool argument as key=value (repeatable)
        #[arg(long = "arg", short = 'a', value_parser = parse_key_val)]
        args: Vec<(String, String)>,

        /// Blob storage root directory
        #[arg(long)]
        storage_root: Option<PathBuf>,
    },

    /// Manage configuration (init or show)
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write an example ./mcp-snippets.toml
    Init,
    /// Show config paths and the effective configuration
    Show,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve {
            bind,
            route,
            storage_root,
            in_memory,
            response_mode,
        } => {
            let mut config = AppConfig::load(cli.config.as_deref())?;
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(route) = route {
                config.server.route = route;
            }
            if let Some(root) = storage_root {
                config.storage.root = Some(root);
            }
            if let Some(mode) = response_mode {
                config.server.response_mode = mode;
            }
            config.validate()?;
            serve::run(config, in_memory)
        }

        Commands::Tools { schema } => tools::run(schema),

        Commands::Call {
            tool,
            args,
            storage_root,
        } => {
            let mut config = AppConfig::load(cli.config.as_deref())?;
            if let Some(root) = storage_root {
                config.storage.root = Some(root);
            }
            call::run(&config, tool, args)
        }

        Commands::Config { action } => run_config_action(action, cli.config.as_deref()),

        Commands::Version => {
            println!("mcp-snippets {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn run_config_action(action: ConfigAction, explicit: Option<&std::path::Path>) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = AppConfig::init_project_config(&std::env::current_dir()?)?;
            println!("Config initialized at: {}", path.display());
            Ok(())
        }
        ConfigAction::Show => {
            println!("Config paths:");
            if let Some(user_path) = AppConfig::user_config_path() {
                let status = if user_path.exists() { "found" } else { "not found" };
                println!("  User:    {} ({})", user_path.display(), status);
            }
            let project = explicit
                .map(std::path::Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(mcp_snippets::config::PROJECT_CONFIG_FILE));
            let status = if project.exists() { "found" } else { "not found" };
            println!("  Project: {} ({})", project.display(), status);
            println!();

            let config = AppConfig::load(explicit)?;
            println!("{}", config.to_redacted_toml()?);
            Ok(())
        }
    }
}
