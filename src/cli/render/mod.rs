//! Render command - renders a prompt document to stdout

use anyhow::Context;
use clap::Args;
use serde_json::Value;

use super::SourceArgs;

/// Arguments for the render command
#[derive(Args, Clone)]
pub struct RenderArgs {
    /// Prompt document locator
    pub locator: String,

    /// Named argument as `key=value`; values are read as JSON when they parse
    #[arg(short = 'a', long = "arg", value_parser = parse_named_argument)]
    pub arguments: Vec<(String, Value)>,

    /// Positional argument, bound to parameters in declaration order
    #[arg(short = 'p', long = "positional")]
    pub positional: Vec<String>,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Render the prompt and print it
pub async fn run(args: RenderArgs) -> anyhow::Result<()> {
    let factory = super::init(&args.source)?;

    let function = factory
        .from_identifier(&args.locator)
        .await
        .with_context(|| format!("Failed to build '{}'", args.locator))?;

    let positional = args.positional.iter().map(|v| parse_value(v)).collect();
    let mut arguments = function.bind_positional(positional)?;

    for (name, value) in args.arguments {
        arguments.insert(name, value);
    }

    let text = function.render(&arguments)?;
    println!("{}", text);

    Ok(())
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn parse_named_argument(raw: &str) -> Result<(String, Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing argument name in '{}'", raw));
    }

    Ok((name.to_string(), parse_value(value)))
}
