use tracing::debug;

use super::artifact::{PromptFunction, UnknownArgumentPolicy};
use crate::domain::error::FunctionError;
use crate::domain::prompt::{ExecutionSettingsMap, InputVariable, OutputVariable, PromptTemplateConfig};
use crate::domain::template::PromptTemplate;

/// Assembles a [`PromptFunction`] from its parts
#[derive(Debug, Default)]
pub struct PromptFunctionBuilder {
    name: Option<String>,
    description: Option<String>,
    input_variables: Vec<InputVariable>,
    output_variable: Option<OutputVariable>,
    execution_settings: ExecutionSettingsMap,
    template: Option<Box<dyn PromptTemplate>>,
    unknown_arguments: UnknownArgumentPolicy,
}

impl PromptFunctionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed every descriptive field from a validated config; the template
    /// instance still has to be supplied
    pub fn from_config(config: &PromptTemplateConfig) -> Self {
        Self {
            name: Some(config.name().to_string()),
            description: config.description().map(str::to_string),
            input_variables: config.input_variables().to_vec(),
            output_variable: config.output_variable().cloned(),
            execution_settings: config.execution_settings().clone(),
            template: None,
            unknown_arguments: UnknownArgumentPolicy::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
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

    pub fn with_template(mut self, template: Box<dyn PromptTemplate>) -> Self {
        self.template = Some(template);
        self
    }

    pub fn with_unknown_argument_policy(mut self, policy: UnknownArgumentPolicy) -> Self {
        self.unknown_arguments = policy;
        self
    }

    pub fn build(self) -> Result<PromptFunction, FunctionError> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| FunctionError::incomplete("name"))?;

        let template = self
            .template
            .ok_or_else(|| FunctionError::incomplete("template"))?;

        debug!(
            function = %name,
            format = %template.format(),
            parameters = self.input_variables.len(),
            "Built prompt function"
        );

        Ok(PromptFunction {
            name,
            description: self.description,
            parameters: self.input_variables,
            output_variable: self.output_variable,
            execution_settings: self.execution_settings,
            template,
            unknown_arguments: self.unknown_arguments,
        })
    }
}
