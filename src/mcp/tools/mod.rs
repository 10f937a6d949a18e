//! MCP tool definitions, argument binding and the tool registry
//!
//! Each sub-module holds one group of tools. A tool is a static
//! [`ToolDefinition`] paired with a [`ToolHandler`]; the registry is built once
//! at startup and only read afterwards.

pub mod hello;
pub mod snippets;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::error::DispatchError;
use crate::storage::BlobStore;

/// One argument a tool requires
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToolProperty {
    pub property_name: String,
    pub property_type: String,
    pub description: String,
}

impl ToolProperty {
    pub fn string(name: &str, description: &str) -> Self {
        Self {
            property_name: name.to_string(),
            property_type: "string".to_string(),
            description: description.to_string(),
        }
    }
}

/// Static metadata for a tool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub tool_name: String,
    pub description: String,
    /// Required arguments, in the order they are checked
    pub tool_properties: Vec<ToolProperty>,
}

impl ToolDefinition {
    pub fn new(tool_name: &str, description: &str) -> Self {
        Self {
            tool_name: tool_name.to_string(),
            description: description.to_string(),
            tool_properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: ToolProperty) -> Self {
        self.tool_properties.push(property);
        self
    }

    /// MCP `tools/list` shape: `{name, description, inputSchema}`
    pub fn to_mcp_tool(&self) -> Value {
        let properties: Map<String, Value> = self
            .tool_properties
            .iter()
            .map(|p| {
                (
                    p.property_name.clone(),
                    json!({ "type": p.property_type, "description": p.description }),
                )
            })
            .collect();
        let required: Vec<&str> = self
            .tool_properties
            .iter()
            .map(|p| p.property_name.as_str())
            .collect();

        json!({
            "name": self.tool_name,
            "description": self.description,
            "inputSchema": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }
}

/// Arguments checked against a tool's definition
#[derive(Debug, Clone, Default)]
pub struct ToolArguments {
    tool: String,
    values: HashMap<String, String>,
}

impl ToolArguments {
    /// Check every required property, in definition order.
    ///
    /// Strings are taken as-is, numbers and booleans as their JSON text. A
    /// null, array or object value is `InvalidArgument`.
    pub fn bind(
        definition: &ToolDefinition,
        arguments: &Map<String, Value>,
    ) -> Result<Self, DispatchError> {
        let mut values = HashMap::with_capacity(definition.tool_properties.len());

        for property in &definition.tool_properties {
            let key = &property.property_name;
            let value = arguments.get(key).ok_or_else(|| DispatchError::MissingArgument {
                tool: definition.tool_name.clone(),
                key: key.clone(),
            })?;

            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => {
                    return Err(DispatchError::InvalidArgument {
                        tool: definition.tool_name.clone(),
                        key: key.clone(),
                    });
                }
            };
            values.insert(key.clone(), text);
        }

        Ok(Self {
            tool: definition.tool_name.clone(),
            values,
        })
    }

    pub fn require(&self, key: &str) -> Result<&str, DispatchError> {
        self.values
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| DispatchError::MissingArgument {
                tool: self.tool.clone(),
                key: key.to_string(),
            })
    }
}

/// Collaborators a tool may use
#[derive(Clone)]
pub struct ToolContext {
    pub store: Arc<dyn BlobStore>,
}

#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn definition(&self) -> &ToolDefinition;

    async fn call(&self, ctx: &ToolContext, args: &ToolArguments) -> Result<Value, DispatchError>;
}

/// Name -> handler table, exact and case-sensitive
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolHandler>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in tool
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(hello::HelloTool::new()));
        registry.register(Arc::new(snippets::SaveSnippetTool::new()));
        registry.register(Arc::new(snippets::GetSnippetTool::new()));
        registry
    }

    /// Add a tool; a later registration under the same name replaces the earlier one
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        let name = handler.definition().tool_name.clone();
        tracing::debug!("Registered tool: {}", name);
        if self.tools.insert(name.clone(), handler).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.tools.get(name)
    }

    /// Definitions in registration order
    pub fn definitions(&self) -> Vec<&ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| t.definition())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
