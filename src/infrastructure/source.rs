//! Prompt document sources

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{FunctionError, PromptSource};

/// Reads prompt documents from disk.
///
/// Relative locators are resolved against the base directory; absolute
/// paths are used as given. Relative locators may not leave the base
/// directory through `..`.
#[derive(Debug, Clone)]
pub struct FileSystemPromptSource {
    base_path: PathBuf,
}

impl FileSystemPromptSource {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a locator to the file it names
    pub fn resolve_path(&self, locator: &str) -> Result<PathBuf, FunctionError> {
        let path = Path::new(locator);

        if locator.trim().is_empty() {
            return Err(FunctionError::source_load(locator, "empty locator"));
        }

        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }

        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(FunctionError::source_load(
                locator,
                "relative locators may not contain '..'",
            ));
        }

        Ok(self.base_path.join(path))
    }
}

#[async_trait]
impl PromptSource for FileSystemPromptSource {
    async fn load(&self, locator: &str) -> Result<String, FunctionError> {
        let path = self.resolve_path(locator)?;
        debug!(locator = %locator, path = %path.display(), "Loading prompt document");

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| FunctionError::source_load(locator, e.to_string()))
    }
}

/// In-memory prompt documents keyed by locator, for tests and embedding
#[derive(Debug, Default)]
pub struct InMemoryPromptSource {
    documents: RwLock<HashMap<String, String>>,
}

impl InMemoryPromptSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, locator: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(locator, text);
        self
    }

    pub fn insert(&self, locator: impl Into<String>, text: impl Into<String>) {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(locator.into(), text.into());
    }
}

#[async_trait]
impl PromptSource for InMemoryPromptSource {
    async fn load(&self, locator: &str) -> Result<String, FunctionError> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(locator)
            .cloned()
            .ok_or_else(|| FunctionError::source_load(locator, "not found"))
    }
}
