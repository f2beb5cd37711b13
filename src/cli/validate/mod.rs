//! Validate command - builds prompt documents without rendering them

use anyhow::Context;
use clap::Args;

use super::SourceArgs;

/// Arguments for the validate command
#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Prompt document locators
    #[arg(required = true)]
    pub locators: Vec<String>,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Build every locator, stopping at the first failure
pub async fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let factory = super::init(&args.source)?;

    for locator in &args.locators {
        let function = factory
            .from_identifier(locator)
            .await
            .with_context(|| format!("Invalid prompt document '{}'", locator))?;

        let required = function
            .parameters()
            .iter()
            .filter(|p| p.needs_argument())
            .count();

        println!(
            "{}\t{}\t{} parameter(s), {} required",
            function.name(),
            function.template_format(),
            function.parameters().len(),
            required
        );
    }

    Ok(())
}
