use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{Config, Environment};
use crate::error::ConfigError;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// `development` or `production`. Overrides RECIPEBOOK_ENV.
    #[arg(long = "env", global = true, value_parser = parse_environment)]
    pub environment: Option<Environment>,

    /// Base URL of the recipe API. Overrides RECIPEBOOK_API_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Where production storage lives. Overrides RECIPEBOOK_DATA_DIR.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Environment variables, then command-line overrides.
    pub fn config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::from_env()?;
        if let Some(environment) = self.environment {
            config.environment = environment;
        }
        if let Some(api_url) = &self.api_url {
            config.api_url = Some(api_url.clone());
        }
        if let Some(data_dir) = &self.data_dir {
            config.data_dir = Some(data_dir.clone());
        }
        Ok(config)
    }
}

fn parse_environment(raw: &str) -> Result<Environment, ConfigError> {
    Environment::parse(raw)
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Level summary for a total amount of experience.
    Level(LevelArgs),
    /// Stored experience.
    Xp {
        #[command(subcommand)]
        command: XpCommand,
    },
    /// Random recipe cards, one JSON object per line.
    Fixtures(FixturesArgs),
    Bookmark {
        #[command(subcommand)]
        command: BookmarkCommand,
    },
    /// Show, set or clear a recipe rating.
    Rate(RateArgs),
    /// Fetch a recipe from the API.
    Recipe {
        #[command(subcommand)]
        command: RecipeCommand,
    },
    /// This week's featured recipe.
    Weekly,
    /// Answer a recipe's quiz and collect the reward.
    Quiz(QuizArgs),
}

#[derive(Debug, Args)]
pub struct LevelArgs {
    /// Total experience points.
    #[arg(long)]
    pub xp: u64,
}

#[derive(Debug, Subcommand)]
pub enum XpCommand {
    Show,
    Add(XpAddArgs),
}

#[derive(Debug, Args)]
pub struct XpAddArgs {
    pub amount: u64,
}

#[derive(Debug, Args)]
pub struct FixturesArgs {
    /// Number of cards to generate.
    #[arg(long, default_value_t = 20)]
    pub count: usize,

    /// Seed for reproducible output.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum BookmarkCommand {
    Add(RecipeIdArgs),
    Remove(RecipeIdArgs),
    List,
}

#[derive(Debug, Args)]
pub struct RecipeIdArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct RateArgs {
    pub id: String,

    /// Stars from 0 to 5 in steps of 0.5.
    #[arg(long, conflicts_with = "clear")]
    pub stars: Option<f64>,

    /// Remove the rating.
    #[arg(long)]
    pub clear: bool,
}

#[derive(Debug, Subcommand)]
pub enum RecipeCommand {
    /// Full recipe by id.
    Id(RecipeIdArgs),
    /// Full recipe by its url slug.
    Short(RecipeShortArgs),
    /// Card-sized recipe by id.
    Basic(RecipeIdArgs),
}

#[derive(Debug, Args)]
pub struct RecipeShortArgs {
    pub short: String,
}

#[derive(Debug, Args)]
pub struct QuizArgs {
    /// Url slug of the recipe.
    pub short: String,

    /// One answer per question, in order.
    #[arg(long = "answer")]
    pub answers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from([
            "recipebook",
            "xp",
            "show",
            "--env",
            "production",
            "--data-dir",
            "/tmp/recipes",
        ])
        .unwrap();
        assert_eq!(cli.global.environment, Some(Environment::Production));
        assert_eq!(cli.global.data_dir, Some(PathBuf::from("/tmp/recipes")));
        assert!(matches!(
            cli.command,
            Command::Xp {
                command: XpCommand::Show
            }
        ));
    }

    #[test]
    fn unknown_environment_is_rejected() {
        assert!(Cli::try_parse_from(["recipebook", "--env", "staging", "weekly"]).is_err());
    }

    #[test]
    fn stars_and_clear_conflict() {
        assert!(
            Cli::try_parse_from(["recipebook", "rate", "abc", "--stars", "3", "--clear"]).is_err()
        );
    }
}
