//! Domain layer - prompt configuration, template engines and built functions

pub mod error;
pub mod function;
pub mod prompt;
pub mod source;
pub mod template;

pub use error::{FunctionError, TemplatePosition};
pub use function::{
    FunctionArguments, FunctionCollection, PromptFunction, PromptFunctionBuilder,
    UnknownArgumentPolicy,
};
pub use prompt::{
    parse_config, parse_document, validate_function_name, DocumentFormat, ExecutionSettings,
    ExecutionSettingsMap, InputVariable, NameValidationError, OutputVariable,
    PromptTemplateConfig, DEFAULT_SERVICE_ID,
};
#[cfg(test)]
pub use source::MockPromptSource;
pub use source::PromptSource;
pub use template::{
    PromptTemplate, TemplateEngineRegistry, TemplateFactory, TemplateFormat,
    DEFAULT_TEMPLATE_FORMAT,
};
