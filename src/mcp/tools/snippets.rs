//! Snippet tools
//!
//! Implements `saveSnippet` and `getSnippet`. Snippet names become blob keys
//! via [`BlobKey::snippet`], which refuses anything that could escape the
//! `snippets` container; the store is never reached with a refused name.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{ToolArguments, ToolContext, ToolDefinition, ToolHandler, ToolProperty};
use crate::mcp::error::DispatchError;
use crate::storage::BlobKey;

pub const SAVE_TOOL_NAME: &str = "saveSnippet";
pub const GET_TOOL_NAME: &str = "getSnippet";

pub const SNIPPET_NAME_PROPERTY_NAME: &str = "snippetName";
pub const SNIPPET_PROPERTY_NAME: &str = "snippet";

fn snippet_name_property() -> ToolProperty {
    ToolProperty::string(SNIPPET_NAME_PROPERTY_NAME, "The name of the snippet.")
}

pub struct SaveSnippetTool {
    definition: ToolDefinition,
}

impl SaveSnippetTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition::new(
                SAVE_TOOL_NAME,
                "Saves a text snippet to your snippet collection.",
            )
            .with_property(snippet_name_property())
            .with_property(ToolProperty::string(
                SNIPPET_PROPERTY_NAME,
                "The content of the snippet.",
            )),
        }
    }
}

impl Default for SaveSnippetTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolHandler for SaveSnippetTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, ctx: &ToolContext, args: &ToolArguments) -> Result<Value, DispatchError> {
        let name = args.require(SNIPPET_NAME_PROPERTY_NAME)?;
        let snippet = args.require(SNIPPET_PROPERTY_NAME)?;
        let key = BlobKey::snippet(name)?;

        tracing::info!("Saving snippet with name: {}", name);
        tracing::debug!("Snippet content:\n{}", snippet);

        ctx.store.put(&key, snippet.as_bytes()).await?;

        Ok(json!({
            "success": true,
            "message": "Snippet saved successfully"
        }))
    }
}

pub struct GetSnippetTool {
    definition: ToolDefinition,
}

impl GetSnippetTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition::new(
                GET_TOOL_NAME,
                "Gets a code snippet from your snippet collection.",
            )
            .with_property(snippet_name_property()),
        }
    }
}

impl Default for GetSnippetTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolHandler for GetSnippetTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, ctx: &ToolContext, args: &ToolArguments) -> Result<Value, DispatchError> {
        let name = args.require(SNIPPET_NAME_PROPERTY_NAME)?;
        let key = BlobKey::snippet(name)?;

        tracing::info!("Retrieving snippet with name: {}", name);

        match ctx.store.get(&key).await {
            Ok(bytes) => {
                let snippet = String::from_utf8(bytes).map_err(|e| {
                    DispatchError::Internal(format!("blob {} is not valid UTF-8: {}", key, e))
                })?;
                Ok(json!({
                    "success": true,
                    "snippet": snippet
                }))
            }
            Err(e) if e.is_not_found() => {
                tracing::info!("Snippet not found: {}", name);
                Ok(json!({
                    "success": false,
                    "error": "not found"
                }))
            }
            Err(e) => Err(e.into()),
        }
    }
}
