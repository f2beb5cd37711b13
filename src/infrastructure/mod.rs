//! Infrastructure layer - logging, document sources and the construction pipeline

pub mod logging;
pub mod services;
pub mod source;

pub use services::PromptFunctionFactory;
pub use source::{FileSystemPromptSource, InMemoryPromptSource};
