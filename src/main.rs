use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;
use recipebook::cli::{Cli, Command};
use recipebook::commands;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    recipebook::logging::init(recipebook::logging::default_directive(cli.global.verbose))
        .context("init logging")?;
    tracing::debug!(?cli, "parsed cli");

    let config = cli.global.config().context("load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Command::Level(args) => commands::level(args).context("level")?,
        Command::Xp { command } => commands::xp(&config, command).context("xp")?,
        Command::Fixtures(args) => commands::fixtures(args).context("fixtures")?,
        Command::Bookmark { command } => {
            commands::bookmark(&config, command).context("bookmark")?;
        }
        Command::Rate(args) => commands::rate(&config, args).context("rate")?,
        Command::Recipe { command } => {
            commands::recipe(&config, command).await.context("recipe")?;
        }
        Command::Weekly => commands::weekly(&config).await.context("weekly")?,
        Command::Quiz(args) => commands::quiz(&config, args).await.context("quiz")?,
    }

    Ok(())
}
