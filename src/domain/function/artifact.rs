//! The built prompt function

use serde_json::Value;
use tracing::{debug, warn};

use super::arguments::FunctionArguments;
use crate::domain::error::FunctionError;
use crate::domain::prompt::{ExecutionSettings, ExecutionSettingsMap, InputVariable, OutputVariable};
use crate::domain::template::PromptTemplate;

/// What to do with render arguments that match neither a parameter nor a
/// template variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownArgumentPolicy {
    /// Log and ignore
    #[default]
    Warn,
    /// Fail the render call
    Reject,
}

impl UnknownArgumentPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict { Self::Reject } else { Self::Warn }
    }
}

/// An immutable, callable prompt function.
///
/// Built once by the builder; every render call is independent and the
/// function can be shared across threads.
#[derive(Debug)]
pub struct PromptFunction {
    pub(super) name: String,
    pub(super) description: Option<String>,
    pub(super) parameters: Vec<InputVariable>,
    pub(super) output_variable: Option<OutputVariable>,
    pub(super) execution_settings: ExecutionSettingsMap,
    pub(super) template: Box<dyn PromptTemplate>,
    pub(super) unknown_arguments: UnknownArgumentPolicy,
}

impl PromptFunction {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Declared parameters, in declaration order
    pub fn parameters(&self) -> &[InputVariable] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&InputVariable> {
        self.parameters.iter().find(|p| p.name() == name)
    }

    pub fn output_variable(&self) -> Option<&OutputVariable> {
        self.output_variable.as_ref()
    }

    pub fn template_format(&self) -> &str {
        self.template.format()
    }

    pub fn template(&self) -> &dyn PromptTemplate {
        self.template.as_ref()
    }

    pub fn execution_settings(&self) -> &ExecutionSettingsMap {
        &self.execution_settings
    }

    pub fn unknown_argument_policy(&self) -> UnknownArgumentPolicy {
        self.unknown_arguments
    }

    /// Settings for a target, falling back to the `default` entry
    pub fn settings_for(&self, target_id: &str) -> Option<&ExecutionSettings> {
        self.execution_settings.settings_for(target_id)
    }

    /// Bind values to parameters in declaration order
    pub fn bind_positional(&self, values: Vec<Value>) -> Result<FunctionArguments, FunctionError> {
        if values.len() > self.parameters.len() {
            return Err(FunctionError::invalid_arguments(
                &self.name,
                format!(
                    "expected at most {} positional values, got {}",
                    self.parameters.len(),
                    values.len()
                ),
            ));
        }

        Ok(self
            .parameters
            .iter()
            .zip(values)
            .map(|(parameter, value)| (parameter.name().to_string(), value))
            .collect())
    }

    /// Render the prompt text for one set of arguments
    pub fn render(&self, arguments: &FunctionArguments) -> Result<String, FunctionError> {
        let bound = self.bind_arguments(arguments)?;

        debug!(
            function = %self.name,
            format = %self.template_format(),
            arguments = bound.len(),
            "Rendering prompt function"
        );

        self.template
            .render(&bound)
            .map_err(|e| e.for_function(&self.name))
    }

    fn is_known(&self, argument: &str) -> bool {
        self.parameter(argument).is_some()
            || self
                .template
                .referenced_variables()
                .iter()
                .any(|v| v == argument)
    }

    fn bind_arguments(&self, arguments: &FunctionArguments) -> Result<FunctionArguments, FunctionError> {
        for argument in arguments.keys().filter(|a| !self.is_known(a)) {
            match self.unknown_arguments {
                UnknownArgumentPolicy::Reject => {
                    return Err(FunctionError::unknown_argument(&self.name, argument));
                }
                UnknownArgumentPolicy::Warn => {
                    warn!(function = %self.name, argument = %argument, "Ignoring unknown argument");
                }
            }
        }

        let mut bound = arguments.clone();

        // A null value leaves the parameter unbound
        for parameter in &self.parameters {
            if bound.get(parameter.name()).is_some_and(|value| !value.is_null()) {
                continue;
            }

            if let Some(default) = parameter.default_value() {
                bound.insert(parameter.name(), default.clone());
            } else if parameter.is_required() {
                return Err(FunctionError::missing_argument(&self.name, parameter.name()));
            }
        }

        Ok(bound)
    }
}
