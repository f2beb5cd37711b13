//! Template instance and factory traits

use std::fmt::Debug;

use serde_json::Value;

#[cfg(test)]
use mockall::automock;

use crate::domain::error::FunctionError;
use crate::domain::function::FunctionArguments;
use crate::domain::prompt::PromptTemplateConfig;

/// A compiled template bound to one syntax and one template body.
///
/// Instances are created once and rendered many times; `render` must not
/// keep per-call state, so one instance can serve concurrent callers.
pub trait PromptTemplate: Send + Sync + Debug {
    /// Format tag this instance was compiled for
    fn format(&self) -> &str;

    /// Original template text
    fn source(&self) -> &str;

    /// Names of the variables the template reads, in first-use order
    fn referenced_variables(&self) -> &[String];

    /// Produce the final prompt text
    fn render(&self, arguments: &FunctionArguments) -> Result<String, FunctionError>;
}

/// Creates template instances for a prompt config.
///
/// Returning `Ok(None)` means the factory declines the config (for example
/// because it does not handle its template format).
#[cfg_attr(test, automock)]
pub trait TemplateFactory: Send + Sync {
    fn try_create(
        &self,
        config: &PromptTemplateConfig,
    ) -> Result<Option<Box<dyn PromptTemplate>>, FunctionError>;
}

/// Text form of an argument value: strings verbatim, null as empty, anything else as JSON
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Push `name` unless it is already listed
pub(crate) fn remember_variable(variables: &mut Vec<String>, name: &str) {
    if !variables.iter().any(|v| v == name) {
        variables.push(name.to_string());
    }
}
