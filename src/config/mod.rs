//! Application configuration

mod app_config;

pub use app_config::{AppConfig, FunctionsConfig, LogFormat, LoggingConfig, ENV_PREFIX};
