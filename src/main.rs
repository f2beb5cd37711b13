use clap::Parser;
use pmp_prompt_functions::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Validate(args) => cli::validate::run(args).await,
        Command::Render(args) => cli::render::run(args).await,
        Command::Settings(args) => cli::settings::run(args).await,
    }
}
