//! Template engines - compile template text into reusable prompt renderers

mod engine;
mod format;
mod handlebars;
mod jinja;
mod plain;
mod registry;
mod segments;
mod semantic_kernel;
mod var;

#[cfg(test)]
pub use engine::MockTemplateFactory;
pub use engine::{value_to_text, PromptTemplate, TemplateFactory};
pub use format::{TemplateFormat, DEFAULT_TEMPLATE_FORMAT};
pub use self::handlebars::HandlebarsTemplate;
pub use jinja::JinjaTemplate;
pub use plain::PlainTemplate;
pub use registry::TemplateEngineRegistry;
pub use semantic_kernel::SemanticKernelTemplate;
pub use var::{PlaceholderVariable, VarTemplate};
