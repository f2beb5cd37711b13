//! Prompt document source trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::error::FunctionError;

/// Resolves a locator (file path, key, ...) to raw prompt document text
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PromptSource: Send + Sync {
    /// Load the document behind `locator`
    async fn load(&self, locator: &str) -> Result<String, FunctionError>;
}
