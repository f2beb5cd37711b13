//! Infrastructure services

mod function_factory;

pub use function_factory::PromptFunctionFactory;
