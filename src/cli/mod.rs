//! CLI module for prompt functions
//!
//! Subcommands:
//! - `validate`: build prompt documents and report what they declare
//! - `render`: render a prompt with named and positional arguments
//! - `settings`: show the execution settings resolved for a target

pub mod render;
pub mod settings;
pub mod validate;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::debug;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::{FileSystemPromptSource, PromptFunctionFactory};

/// Build and render prompt functions from prompt documents
#[derive(Parser)]
#[command(name = "pmp-prompt-functions")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build each document and report its name, format and parameters
    Validate(validate::ValidateArgs),

    /// Render a prompt document to text
    Render(render::RenderArgs),

    /// Print the execution settings for a target
    Settings(settings::SettingsArgs),
}

/// Options shared by every subcommand
#[derive(Args, Clone, Debug, Default)]
pub struct SourceArgs {
    /// Directory relative locators are resolved against (overrides config)
    #[arg(long)]
    pub prompt_dir: Option<String>,

    /// Reject arguments that match no parameter or template variable
    #[arg(long)]
    pub strict: bool,
}

/// Load config, start logging and build the factory for a command
fn init(source: &SourceArgs) -> anyhow::Result<PromptFunctionFactory> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().unwrap_or_default();

    if let Some(prompt_dir) = &source.prompt_dir {
        config.functions.prompt_dir = prompt_dir.clone();
    }

    if source.strict {
        config.functions.strict_arguments = true;
    }

    logging::init_logging(&config.logging)?;
    debug!(prompt_dir = %config.functions.prompt_dir, "Configuration loaded");

    Ok(create_factory(&config))
}

fn create_factory(config: &AppConfig) -> PromptFunctionFactory {
    PromptFunctionFactory::new()
        .with_source(Arc::new(FileSystemPromptSource::new(
            &config.functions.prompt_dir,
        )))
        .with_unknown_argument_policy(config.functions.unknown_argument_policy())
}
