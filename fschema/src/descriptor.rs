//! Function descriptors handed to the completion client.

use fprovider::ToolDefinition;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDescriptor {
    pub name: String,
    pub description: String,
    /// JSON Schema of the call arguments (`requestBody` and/or `parameters`).
    pub parameters: Value,
    /// Index of the owning source within its load.
    pub source: usize,
}

impl FunctionDescriptor {
    pub fn to_tool_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.parameters.to_string(),
        }
    }
}

impl From<&FunctionDescriptor> for ToolDefinition {
    fn from(value: &FunctionDescriptor) -> Self {
        value.to_tool_definition()
    }
}
