//! Prompt configuration model - documents describing a prompt function

mod config;
mod execution_settings;
mod parser;
mod validation;

pub use config::{InputVariable, OutputVariable, PromptTemplateConfig};
pub use execution_settings::{ExecutionSettings, ExecutionSettingsMap, DEFAULT_SERVICE_ID};
pub use parser::{parse_config, parse_document, DocumentFormat, ROOT_PATH};
pub use validation::{validate_function_name, NameValidationError, MAX_FUNCTION_NAME_LENGTH};
