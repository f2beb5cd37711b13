//! Prompt template configuration model

use serde::Serialize;
use serde_json::Value;

use super::execution_settings::{ExecutionSettings, ExecutionSettingsMap};
use crate::domain::template::DEFAULT_TEMPLATE_FORMAT;

/// A declared input parameter of a prompt function
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputVariable {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
    is_required: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    type_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    json_schema: Option<String>,
}

impl InputVariable {
    /// Create a required variable
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            default: None,
            is_required: true,
            type_hint: None,
            json_schema: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_required(mut self, is_required: bool) -> Self {
        self.is_required = is_required;
        self
    }

    pub fn with_type_hint(mut self, type_hint: impl Into<String>) -> Self {
        self.type_hint = Some(type_hint.into());
        self
    }

    pub fn with_json_schema(mut self, json_schema: impl Into<String>) -> Self {
        self.json_schema = Some(json_schema.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.is_required
    }

    pub fn type_hint(&self) -> Option<&str> {
        self.type_hint.as_deref()
    }

    pub fn json_schema(&self) -> Option<&str> {
        self.json_schema.as_deref()
    }

    /// Required and without a default: a caller must supply a value
    pub fn needs_argument(&self) -> bool {
        self.is_required && self.default.is_none()
    }
}

/// Informational description of what a prompt function returns
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutputVariable {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    type_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    json_schema: Option<String>,
}

impl OutputVariable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_type_hint(mut self, type_hint: impl Into<String>) -> Self {
        self.type_hint = Some(type_hint.into());
        self
    }

    pub fn with_json_schema(mut self, json_schema: impl Into<String>) -> Self {
        self.json_schema = Some(json_schema.into());
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn type_hint(&self) -> Option<&str> {
        self.type_hint.as_deref()
    }

    pub fn json_schema(&self) -> Option<&str> {
        self.json_schema.as_deref()
    }
}

/// Validated description of a prompt function.
///
/// Values are produced by the document parser or assembled with the
/// `with_*` constructors; nothing mutates a config once it is shared.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptTemplateConfig {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    template: String,
    template_format: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    input_variables: Vec<InputVariable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_variable: Option<OutputVariable>,
    #[serde(skip_serializing_if = "ExecutionSettingsMap::is_empty")]
    execution_settings: ExecutionSettingsMap,
}

impl PromptTemplateConfig {
    /// Create a config with the default template format
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            template: template.into(),
            template_format: DEFAULT_TEMPLATE_FORMAT.to_string(),
            input_variables: Vec::new(),
            output_variable: None,
            execution_settings: ExecutionSettingsMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_template_format(mut self, format: impl Into<String>) -> Self {
        self.template_format = format.into();
        self
    }

    pub fn with_input_variable(mut self, variable: InputVariable) -> Self {
        self.input_variables.push(variable);
        self
    }

    pub fn with_input_variables(mut self, variables: Vec<InputVariable>) -> Self {
        self.input_variables = variables;
        self
    }

    pub fn with_output_variable(mut self, output: OutputVariable) -> Self {
        self.output_variable = Some(output);
        self
    }

    pub fn with_execution_settings(mut self, settings: ExecutionSettingsMap) -> Self {
        self.execution_settings = settings;
        self
    }

    // Getters

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn template_format(&self) -> &str {
        &self.template_format
    }

    pub fn input_variables(&self) -> &[InputVariable] {
        &self.input_variables
    }

    pub fn input_variable(&self, name: &str) -> Option<&InputVariable> {
        self.input_variables.iter().find(|v| v.name() == name)
    }

    pub fn output_variable(&self) -> Option<&OutputVariable> {
        self.output_variable.as_ref()
    }

    pub fn execution_settings(&self) -> &ExecutionSettingsMap {
        &self.execution_settings
    }

    pub fn default_execution_settings(&self) -> Option<&ExecutionSettings> {
        self.execution_settings.default_settings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_config_uses_default_format() {
        let config = PromptTemplateConfig::new("greet", "Hello, {{name}}!");
        assert_eq!(config.name(), "greet");
        assert_eq!(config.template_format(), DEFAULT_TEMPLATE_FORMAT);
        assert!(config.input_variables().is_empty());
        assert!(config.output_variable().is_none());
    }

    #[test]
    fn test_input_variable_defaults() {
        let variable = InputVariable::new("name");
        assert!(variable.is_required());
        assert!(variable.needs_argument());

        let variable = variable.with_default("World");
        assert!(variable.is_required());
        assert!(!variable.needs_argument());
        assert_eq!(variable.default_value(), Some(&json!("World")));
    }

    #[test]
    fn test_input_variable_lookup_preserves_order() {
        let config = PromptTemplateConfig::new("f", "")
            .with_input_variable(InputVariable::new("b"))
            .with_input_variable(InputVariable::new("a"));

        let names: Vec<&str> = config.input_variables().iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert!(config.input_variable("a").is_some());
        assert!(config.input_variable("c").is_none());
    }

    #[test]
    fn test_serialize_uses_document_keys() {
        let config = PromptTemplateConfig::new("greet", "Hi")
            .with_input_variable(InputVariable::new("name").with_type_hint("string"));

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["input_variables"][0]["type"], json!("string"));
        assert_eq!(value["template_format"], json!("handlebars"));
        assert!(value.get("execution_settings").is_none());
    }
}
