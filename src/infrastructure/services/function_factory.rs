//! Prompt function factory - text or locator in, built function out

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::prompt::{parse_config, DocumentFormat, PromptTemplateConfig};
use crate::domain::template::{TemplateEngineRegistry, TemplateFactory};
use crate::domain::{
    FunctionCollection, FunctionError, PromptFunction, PromptFunctionBuilder, PromptSource,
    UnknownArgumentPolicy,
};

/// Runs parse, template resolution and build for prompt documents
#[derive(Clone)]
pub struct PromptFunctionFactory {
    registry: Arc<TemplateEngineRegistry>,
    source: Option<Arc<dyn PromptSource>>,
    unknown_arguments: UnknownArgumentPolicy,
}

impl Default for PromptFunctionFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PromptFunctionFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptFunctionFactory")
            .field("registry", &self.registry)
            .field("has_source", &self.source.is_some())
            .field("unknown_arguments", &self.unknown_arguments)
            .finish()
    }
}

impl PromptFunctionFactory {
    /// Factory with the built-in template formats and no document source
    pub fn new() -> Self {
        Self {
            registry: Arc::new(TemplateEngineRegistry::new()),
            source: None,
            unknown_arguments: UnknownArgumentPolicy::default(),
        }
    }

    pub fn with_registry(mut self, registry: Arc<TemplateEngineRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_source(mut self, source: Arc<dyn PromptSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_unknown_argument_policy(mut self, policy: UnknownArgumentPolicy) -> Self {
        self.unknown_arguments = policy;
        self
    }

    pub fn registry(&self) -> &TemplateEngineRegistry {
        &self.registry
    }

    /// Build from a YAML document
    pub fn from_text(
        &self,
        text: &str,
        override_factory: Option<&dyn TemplateFactory>,
    ) -> Result<PromptFunction, FunctionError> {
        self.from_text_with_format(text, DocumentFormat::Yaml, override_factory)
    }

    pub fn from_text_with_format(
        &self,
        text: &str,
        format: DocumentFormat,
        override_factory: Option<&dyn TemplateFactory>,
    ) -> Result<PromptFunction, FunctionError> {
        let config = parse_config(text, format)?;
        self.from_config(&config, override_factory)
    }

    /// Resolve the template and assemble the function for a parsed config
    pub fn from_config(
        &self,
        config: &PromptTemplateConfig,
        override_factory: Option<&dyn TemplateFactory>,
    ) -> Result<PromptFunction, FunctionError> {
        let template = self.registry.resolve(config, override_factory)?;

        for variable in template.referenced_variables() {
            if config.input_variable(variable).is_none() {
                warn!(
                    function = %config.name(),
                    variable = %variable,
                    "Template references an undeclared input variable"
                );
            }
        }

        PromptFunctionBuilder::from_config(config)
            .with_template(template)
            .with_unknown_argument_policy(self.unknown_arguments)
            .build()
    }

    /// Load a document through the configured source and build it.
    ///
    /// The document format follows the locator's extension.
    pub async fn from_identifier(&self, locator: &str) -> Result<PromptFunction, FunctionError> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| FunctionError::source_load(locator, "no prompt source configured"))?;

        let text = source.load(locator).await?;
        let format = DocumentFormat::from_locator(locator);
        debug!(locator = %locator, format = %format.name(), "Building function from source");

        self.from_text_with_format(&text, format, None)
    }

    /// Build every locator into `collection`, stopping at the first failure
    pub async fn load_into<S: AsRef<str>>(
        &self,
        collection: &FunctionCollection,
        locators: &[S],
    ) -> Result<Vec<Arc<PromptFunction>>, FunctionError> {
        let mut loaded = Vec::with_capacity(locators.len());

        for locator in locators {
            let function = self.from_identifier(locator.as_ref()).await?;
            loaded.push(collection.add(function)?);
        }

        info!(count = loaded.len(), "Loaded prompt functions");
        Ok(loaded)
    }
}
