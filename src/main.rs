use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tension_stories::components::agent::Faction;
use tension_stories::config::StoryConfig;
use tension_stories::content::cast::load_cast_from_path;
use tension_stories::core::story::Story;
use tension_stories::narrative::{conclude, introduce_cast, introduce_world, render_event};
use tension_stories::simulation::search::SearchOptions;
use tension_stories::world::{StatsDb, StatsRepository};

#[derive(Parser, Debug)]
#[command(name = "tension-stories")]
#[command(about = "Tell a monsters-versus-humans story planned for maximum tension")]
struct Args {
    /// Names file (one per line) or a JSON cast catalog
    cast: PathBuf,

    /// JSON story configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQLite statistics database
    #[arg(long)]
    db: Option<PathBuf>,

    /// Random seed (uses a random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Round limit for an unresolved story
    #[arg(long)]
    max_rounds: Option<u32>,

    /// Explore every branch instead of pruning with alpha-beta
    #[arg(long)]
    no_pruning: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "story failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut config = match &args.config {
        Some(path) => StoryConfig::load_from_path(path)?,
        None => StoryConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(db) = args.db {
        config.stats_db_path = db;
    }
    if let Some(max_rounds) = args.max_rounds {
        config.max_rounds = max_rounds;
    }
    config.validate()?;

    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    info!(
        seed,
        db = %config.stats_db_path.display(),
        max_rounds = config.max_rounds,
        "configuration loaded"
    );

    let cast = load_cast_from_path(&args.cast, config.zone_count, &mut rng)?;
    info!(agents = cast.len(), path = %args.cast.display(), "cast loaded");

    let stats = StatsDb::open(&config.stats_db_path)?;
    let mut story = Story::new(cast, &config, Box::new(stats), rng)?.with_search_options(
        SearchOptions {
            pruning: !args.no_pruning,
        },
    );

    println!("{}", introduce_world(&story.state()));
    for line in introduce_cast(story.cast()) {
        println!("{}", line);
    }
    println!();

    let outcome = story.run_to_completion(|report, cast| {
        for event in &report.events {
            println!("{}", render_event(event, cast));
        }
    })?;

    println!();
    for line in conclude(&outcome.state, story.cast()) {
        println!("{}", line);
    }

    println!();
    println!("Stories won:");
    for (faction, wins) in story.stats().outcomes()? {
        println!("  {}: {}", faction.label(), wins);
    }
    println!("Human action usage:");
    for stat in story.stats().action_stats(Faction::Human)? {
        println!(
            "  {}: {} ({:.1}%)",
            stat.action.verb(),
            stat.times_used,
            stat.percentage * 100.0
        );
    }
    Ok(())
}
