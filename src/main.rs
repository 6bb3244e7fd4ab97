use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    scrollystory::logging::init(scrollystory::logging::DEFAULT_DIRECTIVE)
        .context("init logging")?;

    let cli = scrollystory::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        scrollystory::cli::Command::Build(args) => {
            scrollystory::build::run(args).await.context("build")?;
        }
        scrollystory::cli::Command::Blocks(args) => {
            scrollystory::build::blocks(args).await.context("blocks")?;
        }
    }

    Ok(())
}
