//! Hello-world tool: logs its trigger input and echoes it back

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{ToolArguments, ToolContext, ToolDefinition, ToolHandler, ToolProperty};
use crate::mcp::error::DispatchError;

pub const TOOL_NAME: &str = "getsnippets";
pub const TRIGGER_INPUT: &str = "triggerInput";

pub struct HelloTool {
    definition: ToolDefinition,
}

impl HelloTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition::new(
                TOOL_NAME,
                "Logs the provided string along with \"Hello, World!\" and echoes it back.",
            )
            .with_property(ToolProperty::string(TRIGGER_INPUT, "input string")),
        }
    }
}

impl Default for HelloTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolHandler for HelloTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, _ctx: &ToolContext, args: &ToolArguments) -> Result<Value, DispatchError> {
        let input = args.require(TRIGGER_INPUT)?;
        tracing::info!(tool = TOOL_NAME, "Trigger input: {}", input);
        tracing::info!("Hello, World!");
        Ok(json!({ "content": input }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBlobStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_echoes_input() {
        let tool = HelloTool::new();
        let ctx = ToolContext {
            store: Arc::new(MemoryBlobStore::new()),
        };
        let raw = json!({ "triggerInput": "Hello, World!" });
        let args = ToolArguments::bind(tool.definition(), raw.as_object().unwrap()).unwrap();

        let payload = tool.call(&ctx, &args).await.unwrap();
        assert_eq!(payload, json!({ "content": "Hello, World!" }));
    }

    #[tokio::test]
    async fn test_special_characters_survive() {
        // The payload is built as JSON, so quotes in the input stay well-formed
        let tool = HelloTool::new();
        let ctx = ToolContext {
            store: Arc::new(MemoryBlobStore::new()),
        };
        let raw = json!({ "triggerInput": "say \"hi\"\n" });
        let args = ToolArguments::bind(tool.definition(), raw.as_object().unwrap()).unwrap();

        let payload = tool.call(&ctx, &args).await.unwrap();
        assert_eq!(payload["content"], "say \"hi\"\n");
    }
}
