//! Prompt functions - built artifacts, their builder and named collections

mod arguments;
mod artifact;
mod builder;
mod collection;

pub use arguments::FunctionArguments;
pub use artifact::{PromptFunction, UnknownArgumentPolicy};
pub use builder::PromptFunctionBuilder;
pub use collection::FunctionCollection;
