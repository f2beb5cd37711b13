//! Settings command - prints execution settings resolved for a target

use anyhow::Context;
use clap::Args;

use super::SourceArgs;
use crate::domain::DEFAULT_SERVICE_ID;

/// Arguments for the settings command
#[derive(Args, Clone)]
pub struct SettingsArgs {
    /// Prompt document locator
    pub locator: String,

    /// Target (service) id; unknown targets fall back to the default entry
    #[arg(long, default_value = DEFAULT_SERVICE_ID)]
    pub target: String,

    #[command(flatten)]
    pub source: SourceArgs,
}

pub async fn run(args: SettingsArgs) -> anyhow::Result<()> {
    let factory = super::init(&args.source)?;

    let function = factory
        .from_identifier(&args.locator)
        .await
        .with_context(|| format!("Failed to build '{}'", args.locator))?;

    match function.settings_for(&args.target) {
        Some(settings) => println!("{}", serde_json::to_string_pretty(settings)?),
        None => println!("no settings"),
    }

    Ok(())
}
