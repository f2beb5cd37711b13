use serde::Deserialize;

use crate::domain::UnknownArgumentPolicy;

/// Environment variable prefix, e.g. `PROMPTFN__LOGGING__LEVEL=debug`
pub const ENV_PREFIX: &str = "PROMPTFN";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub functions: FunctionsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Settings applied when loading and rendering prompt functions
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FunctionsConfig {
    /// Directory relative locators are resolved against
    pub prompt_dir: String,
    /// Reject render arguments that match no parameter or template variable
    pub strict_arguments: bool,
}

impl FunctionsConfig {
    pub fn unknown_argument_policy(&self) -> UnknownArgumentPolicy {
        UnknownArgumentPolicy::from_strict(self.strict_arguments)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for FunctionsConfig {
    fn default() -> Self {
        Self {
            prompt_dir: "prompts".to_string(),
            strict_arguments: false,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.functions.prompt_dir, "prompts");
        assert!(!config.functions.strict_arguments);
        assert_eq!(
            config.functions.unknown_argument_policy(),
            UnknownArgumentPolicy::Warn
        );
    }

    #[test]
    fn test_partial_sources_fall_back_to_defaults() {
        let config: AppConfig = config::Config::builder()
            .set_override("functions.strict_arguments", true)
            .unwrap()
            .set_override("logging.format", "json")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.functions.prompt_dir, "prompts");
        assert_eq!(
            config.functions.unknown_argument_policy(),
            UnknownArgumentPolicy::Reject
        );
    }
}
