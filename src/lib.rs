//! PMP Prompt Functions
//!
//! Turns prompt documents into callable prompt functions:
//! - Parse YAML, JSON or TOML documents into a validated configuration
//! - Resolve the template engine for the document's template format
//! - Build an immutable function that renders prompt text and exposes
//!   per-target execution settings

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    FunctionArguments, FunctionCollection, FunctionError, PromptFunction, PromptTemplateConfig,
};
pub use infrastructure::PromptFunctionFactory;

/// Build a function from a YAML prompt document using the built-in template formats
pub fn from_prompt_yaml(text: &str) -> Result<PromptFunction, FunctionError> {
    PromptFunctionFactory::new().from_text(text, None)
}
