//! `tools` command handler

use anyhow::Result;
use serde_json::Value;

use mcp_snippets::mcp::tools::ToolRegistry;

pub fn run(schema: bool) -> Result<()> {
    let registry = ToolRegistry::builtin();
    let definitions = registry.definitions();

    let output = if schema {
        Value::Array(definitions.iter().map(|d| d.to_mcp_tool()).collect())
    } else {
        serde_json::to_value(&definitions)?
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
