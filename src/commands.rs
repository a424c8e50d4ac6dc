//! Subcommand handlers. Results go to stdout, logs to stderr.

use anyhow::Context as _;
use rand::SeedableRng as _;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::api::ApiClient;
use crate::cli::{
    BookmarkCommand, FixturesArgs, LevelArgs, QuizArgs, RateArgs, RecipeCommand, XpCommand,
};
use crate::config::Config;
use crate::fixtures;
use crate::leveling;
use crate::recipe::{Rating, RecipeId, RecipeService};
use crate::store::Storage;

pub fn level(args: LevelArgs) -> anyhow::Result<()> {
    print_json(&leveling::get_level(args.xp))
}

pub fn xp(config: &Config, command: XpCommand) -> anyhow::Result<()> {
    let storage = Storage::open(config).context("open storage")?;
    let info = match command {
        XpCommand::Show => storage.leveling_info().context("read experience")?,
        XpCommand::Add(args) => storage.add_xp(args.amount).context("add experience")?,
    };
    print_json(&info)
}

pub fn fixtures(args: FixturesArgs) -> anyhow::Result<()> {
    let cards = match args.seed {
        Some(seed) => {
            fixtures::generate_basic_recipes_with(&mut StdRng::seed_from_u64(seed), args.count)
        }
        None => fixtures::generate_basic_recipes(args.count),
    };
    tracing::debug!(count = cards.len(), seed = ?args.seed, "generated fixtures");
    for card in &cards {
        println!("{}", serde_json::to_string(card).context("serialize recipe card")?);
    }
    Ok(())
}

pub fn bookmark(config: &Config, command: BookmarkCommand) -> anyhow::Result<()> {
    let storage = Storage::open(config).context("open storage")?;
    match command {
        BookmarkCommand::Add(args) => storage
            .set_bookmarked(&RecipeId::from(args.id), true)
            .context("add bookmark")?,
        BookmarkCommand::Remove(args) => storage
            .set_bookmarked(&RecipeId::from(args.id), false)
            .context("remove bookmark")?,
        BookmarkCommand::List => {
            for id in &storage.bookmarks().context("read bookmarks")? {
                println!("{id}");
            }
        }
    }
    Ok(())
}

pub fn rate(config: &Config, args: RateArgs) -> anyhow::Result<()> {
    let storage = Storage::open(config).context("open storage")?;
    let id = RecipeId::from(args.id);

    if args.clear {
        storage.set_rating(&id, None).context("clear rating")?;
        return Ok(());
    }

    if let Some(stars) = args.stars {
        let rating = Rating::try_from(stars)?;
        storage.set_rating(&id, Some(rating)).context("write rating")?;
        println!("{rating}");
        return Ok(());
    }

    match storage.rating(&id).context("read ratings")? {
        Some(rating) => println!("{rating}"),
        None => println!("unrated"),
    }
    Ok(())
}

pub async fn recipe(config: &Config, command: RecipeCommand) -> anyhow::Result<()> {
    let service = service(config)?;
    match command {
        RecipeCommand::Id(args) => {
            let recipe = service.get_by_id(&RecipeId::from(args.id)).await?;
            print_json(&*recipe)
        }
        RecipeCommand::Short(args) => {
            let recipe = service.get_by_short(&args.short).await?;
            print_json(&*recipe)
        }
        RecipeCommand::Basic(args) => {
            let recipe = service.get_basic(&RecipeId::from(args.id)).await?;
            let storage = Storage::open(config).context("open storage")?;
            print_json(&recipe.card(&storage).context("read recipe state")?)
        }
    }
}

pub async fn weekly(config: &Config) -> anyhow::Result<()> {
    let recipe = service(config)?.weekly().await?;
    print_json(&recipe)
}

pub async fn quiz(config: &Config, args: QuizArgs) -> anyhow::Result<()> {
    let recipe = service(config)?.get_by_short(&args.short).await?;
    let quiz = recipe
        .quiz
        .as_ref()
        .with_context(|| format!("recipe `{}` has no quiz", args.short))?;

    let storage = Storage::open(config).context("open storage")?;
    let (result, info) = storage
        .complete_quiz(quiz, &args.answers)
        .context("record quiz reward")?;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct QuizReport {
        correct: usize,
        total: usize,
        all_correct: bool,
        reward: u64,
        leveling: leveling::LevelingInfo,
    }

    print_json(&QuizReport {
        correct: result.correct,
        total: result.total,
        all_correct: result.all_correct(),
        reward: result.reward,
        leveling: info,
    })
}

fn service(config: &Config) -> anyhow::Result<RecipeService> {
    let client = ApiClient::from_config(config).context("configure api client")?;
    tracing::debug!(base_url = %client.base_url(), "api client ready");
    Ok(RecipeService::new(client))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("serialize output")?
    );
    Ok(())
}
