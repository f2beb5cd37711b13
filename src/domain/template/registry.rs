//! Template engine registry
//!
//! Maps a template format tag to the engine that compiles it. Built-in
//! formats are always available; extra engines can be registered at startup
//! and are looked up on every resolution.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use super::engine::{PromptTemplate, TemplateFactory};
use super::format::TemplateFormat;
use crate::domain::error::FunctionError;
use crate::domain::prompt::PromptTemplateConfig;

/// Registry of template engines keyed by format tag
#[derive(Default)]
pub struct TemplateEngineRegistry {
    /// Engines registered at runtime, keyed by normalized tag
    custom: RwLock<HashMap<String, Arc<dyn TemplateFactory>>>,
}

fn normalize(format: &str) -> String {
    format.trim().to_ascii_lowercase()
}

impl TemplateEngineRegistry {
    /// Create a registry with only the built-in formats
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an engine for a new format tag
    pub fn register(
        &self,
        format: &str,
        factory: Arc<dyn TemplateFactory>,
    ) -> Result<(), FunctionError> {
        let key = normalize(format);

        if key.is_empty() || key.parse::<TemplateFormat>().is_ok() {
            return Err(FunctionError::duplicate_format(format));
        }

        let mut custom = self.custom.write().unwrap_or_else(PoisonError::into_inner);

        if custom.contains_key(&key) {
            return Err(FunctionError::duplicate_format(format));
        }

        info!(format = %key, "Registering template engine");
        custom.insert(key, factory);
        Ok(())
    }

    /// Remove a runtime-registered engine
    pub fn unregister(&self, format: &str) -> bool {
        self.custom
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&normalize(format))
            .is_some()
    }

    /// Check if a format tag can be resolved without an override
    pub fn supports(&self, format: &str) -> bool {
        let key = normalize(format);
        key.parse::<TemplateFormat>().is_ok()
            || self
                .custom
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .contains_key(&key)
    }

    /// All resolvable format tags, sorted
    pub fn formats(&self) -> Vec<String> {
        let mut formats: Vec<String> = TemplateFormat::all()
            .iter()
            .map(|f| f.as_str().to_string())
            .collect();

        formats.extend(
            self.custom
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .keys()
                .cloned(),
        );
        formats.sort();
        formats
    }

    /// Resolve the template instance for `config`.
    ///
    /// A caller-supplied `override_factory` is authoritative: if it declines
    /// or fails, resolution fails instead of falling back to the registry.
    pub fn resolve(
        &self,
        config: &PromptTemplateConfig,
        override_factory: Option<&dyn TemplateFactory>,
    ) -> Result<Box<dyn PromptTemplate>, FunctionError> {
        let format = config.template_format();

        if let Some(factory) = override_factory {
            debug!(function = %config.name(), format = %format, "Resolving template with override factory");
            return factory
                .try_create(config)?
                .ok_or_else(|| FunctionError::unsupported_format(format));
        }

        let key = normalize(format);

        let registered = self
            .custom
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();

        if let Some(factory) = registered {
            debug!(function = %config.name(), format = %key, "Resolving template with registered engine");
            return factory
                .try_create(config)?
                .ok_or_else(|| FunctionError::unsupported_format(format));
        }

        let builtin = key
            .parse::<TemplateFormat>()
            .map_err(|_| FunctionError::unsupported_format(format))?;

        debug!(function = %config.name(), format = %builtin, "Resolving built-in template");
        builtin.compile(config.template())
    }
}

impl fmt::Debug for TemplateEngineRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateEngineRegistry")
            .field("formats", &self.formats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::function::FunctionArguments;
    use crate::domain::template::{MockTemplateFactory, PlainTemplate};

    fn config_with_format(format: &str) -> PromptTemplateConfig {
        PromptTemplateConfig::new("greet", "Hello, {{name}}!").with_template_format(format)
    }

    fn plain_factory() -> MockTemplateFactory {
        let mut factory = MockTemplateFactory::new();
        factory.expect_try_create().returning(|config| {
            let template = PlainTemplate::new(format!("custom:{}", config.template()));
            Ok(Some(Box::new(template) as Box<dyn PromptTemplate>))
        });
        factory
    }

    #[test]
    fn test_resolve_builtin_default() {
        let registry = TemplateEngineRegistry::new();
        let template = registry
            .resolve(&PromptTemplateConfig::new("greet", "Hello, {{name}}!"), None)
            .unwrap();

        assert_eq!(template.format(), "handlebars");
        let arguments = FunctionArguments::new().with("name", "Ada");
        assert_eq!(template.render(&arguments).unwrap(), "Hello, Ada!");
    }

    #[test]
    fn test_resolve_unknown_format() {
        let registry = TemplateEngineRegistry::new();
        let result = registry.resolve(&config_with_format("unknown-syntax"), None);
        assert_eq!(
            result.unwrap_err(),
            FunctionError::unsupported_format("unknown-syntax")
        );
    }

    #[test]
    fn test_override_takes_precedence() {
        let registry = TemplateEngineRegistry::new();
        let factory = plain_factory();

        let template = registry
            .resolve(&config_with_format("unknown-syntax"), Some(&factory))
            .unwrap();

        assert_eq!(
            template.render(&FunctionArguments::new()).unwrap(),
            "custom:Hello, {{name}}!"
        );
    }

    #[test]
    fn test_override_decline_does_not_fall_back() {
        let registry = TemplateEngineRegistry::new();
        let mut factory = MockTemplateFactory::new();
        factory.expect_try_create().times(1).returning(|_| Ok(None));

        let result = registry.resolve(&config_with_format("handlebars"), Some(&factory));
        assert_eq!(
            result.unwrap_err(),
            FunctionError::unsupported_format("handlebars")
        );
    }

    #[test]
    fn test_override_error_propagates() {
        let registry = TemplateEngineRegistry::new();
        let mut factory = MockTemplateFactory::new();
        factory
            .expect_try_create()
            .returning(|_| Err(FunctionError::template_compile("custom", "boom", None)));

        let result = registry.resolve(&config_with_format("handlebars"), Some(&factory));
        assert!(matches!(result, Err(FunctionError::TemplateCompile { .. })));
    }

    #[test]
    fn test_register_custom_engine() {
        let registry = TemplateEngineRegistry::new();
        registry.register("Mustache", Arc::new(plain_factory())).unwrap();

        assert!(registry.supports("mustache"));
        assert!(registry.formats().contains(&"mustache".to_string()));

        let template = registry.resolve(&config_with_format("mustache"), None).unwrap();
        assert_eq!(
            template.render(&FunctionArguments::new()).unwrap(),
            "custom:Hello, {{name}}!"
        );
    }

    #[test]
    fn test_register_rejects_builtin_and_duplicates() {
        let registry = TemplateEngineRegistry::new();

        assert!(matches!(
            registry.register("handlebars", Arc::new(MockTemplateFactory::new())),
            Err(FunctionError::DuplicateTemplateFormat { .. })
        ));

        registry.register("custom", Arc::new(MockTemplateFactory::new())).unwrap();
        assert!(matches!(
            registry.register(" CUSTOM ", Arc::new(MockTemplateFactory::new())),
            Err(FunctionError::DuplicateTemplateFormat { .. })
        ));
    }

    #[test]
    fn test_unregister() {
        let registry = TemplateEngineRegistry::new();
        registry.register("custom", Arc::new(MockTemplateFactory::new())).unwrap();

        assert!(registry.unregister("custom"));
        assert!(!registry.unregister("custom"));
        assert!(!registry.supports("custom"));
    }

    #[test]
    fn test_compile_error_surfaces() {
        let registry = TemplateEngineRegistry::new();
        let config = PromptTemplateConfig::new("broken", "Hello, {{name");
        let result = registry.resolve(&config, None);
        assert!(matches!(result, Err(FunctionError::TemplateCompile { .. })));
    }

    #[test]
    fn test_builtin_formats_listed() {
        let formats = TemplateEngineRegistry::new().formats();
        assert_eq!(
            formats,
            vec!["handlebars", "jinja2", "plain", "semantic-kernel", "var"]
        );
    }
}
