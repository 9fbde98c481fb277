use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{ArgGroup, Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crowd_pulse::busyness::{self, current_busyness};
use crowd_pulse::clock::{Clock, FixedClock, SystemClock};
use crowd_pulse::config::Config;
use crowd_pulse::models::{Place, TimeContext};
use crowd_pulse::{catalog, db, hotness, report, trending};

#[derive(Parser)]
#[command(name = "crowd-pulse")]
#[command(about = "How busy places are right now, and what is trending", long_about = None)]
struct Cli {
    /// Read places from a json file instead of Postgres
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load demo places with typical busyness curves
    Seed,
    /// Import places from a json or csv file
    #[command(group(
        ArgGroup::new("source")
            .args(["json", "csv"])
            .required(true)
            .multiple(false)
    ))]
    Import {
        #[arg(long)]
        json: Option<PathBuf>,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Show how busy one place is right now
    Now {
        id: String,
        /// Evaluate at this RFC 3339 instant instead of the wall clock
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// List places ranked by current busyness
    Trending {
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = trending::DEFAULT_TRENDING_LIMIT)]
        limit: usize,
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// List places ranked by hotness score
    Hottest {
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Generate a markdown trending report
    Report {
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::InitDb => {
            let pool = connect(&config).await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let pool = connect(&config).await?;
            let written = db::seed(&pool).await?;
            println!("Seeded {written} places.");
        }
        Commands::Import { json, csv } => {
            let pool = connect(&config).await?;
            let (written, path) = match (json, csv) {
                (Some(path), _) => (db::import_json(&pool, &path).await?, path),
                (None, Some(path)) => (db::import_csv(&pool, &path).await?, path),
                (None, None) => anyhow::bail!("either --json or --csv is required"),
            };
            println!("Imported {written} places from {}.", path.display());
        }
        Commands::Now { id, at } => {
            let places = load_places(cli.catalog.as_ref(), &config, None).await?;
            let ctx = time_context(at);
            let place = places
                .iter()
                .find(|place| place.id == id)
                .with_context(|| format!("no place with id {id}"))?;
            print_current(place, ctx);
        }
        Commands::Trending {
            category,
            limit,
            at,
        } => {
            let places = load_places(cli.catalog.as_ref(), &config, category.as_deref()).await?;
            let ctx = time_context(at);
            let ranked = trending::trending(&places, ctx, limit);

            if ranked.is_empty() {
                println!("No busy places at {ctx}.");
                return Ok(());
            }

            println!("Trending now ({ctx}):");
            for (rank, entry) in ranked.iter().enumerate() {
                println!(
                    "{:>2}. {} {} {} {}%",
                    rank + 1,
                    entry.place.display_name(),
                    entry.level.glyph(),
                    entry.level.label(),
                    entry.value
                );
            }
        }
        Commands::Hottest {
            category,
            limit,
            at,
        } => {
            let places = load_places(cli.catalog.as_ref(), &config, None).await?;
            let ctx = time_context(at);
            let hottest = hotness::hottest_places(&places, ctx, limit, category.as_deref());

            if hottest.is_empty() {
                println!("No places found.");
                return Ok(());
            }

            println!("Hottest places:");
            for (rank, hot) in hottest.iter().enumerate() {
                let reasons: String = hot.reasons.iter().map(|r| r.glyph()).collect();
                println!(
                    "{:>2}. {} score {:.1} ({}) {}",
                    rank + 1,
                    hot.place.display_name(),
                    hot.score,
                    hot.tier.id(),
                    reasons
                );
            }
        }
        Commands::Report {
            category,
            limit,
            at,
            out,
        } => {
            let places = load_places(cli.catalog.as_ref(), &config, category.as_deref()).await?;
            let ctx = time_context(at);
            let report = report::build_report(category.as_deref(), ctx, &places, limit);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set to a Postgres instance (or pass --catalog)")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")?;
    info!(max_connections = config.max_connections, "connected to Postgres");
    Ok(pool)
}

async fn load_places(
    catalog_path: Option<&PathBuf>,
    config: &Config,
    category: Option<&str>,
) -> anyhow::Result<Vec<Place>> {
    match catalog_path {
        Some(path) => {
            let places = catalog::load_places(path)?;
            Ok(catalog::filter_category(places, category))
        }
        None => {
            let pool = connect(config).await?;
            db::fetch_places(&pool, category).await
        }
    }
}

fn time_context(at: Option<DateTime<Utc>>) -> TimeContext {
    let ctx = match at {
        Some(instant) => FixedClock(instant).time_context(),
        None => SystemClock.time_context(),
    };
    debug!(%ctx, "resolved time context");
    ctx
}

fn print_current(place: &Place, ctx: TimeContext) {
    println!("{} ({})", place.display_name(), ctx);

    let Some(current) = current_busyness(place, ctx) else {
        println!("No busyness data for {}.", ctx.day());
        return;
    };
    println!(
        "Now: {} {} ({}%)",
        current.level.glyph(),
        current.level.label(),
        current.value
    );
    if let Some(best) = place.best_visit_time.as_deref() {
        println!("Best time to visit: {best}");
    }
    if let Some(peak) = place.peak_hours.as_deref() {
        println!("Peak hours: {peak}");
    }

    let Some(table) = place.popular_times.as_ref() else {
        return;
    };
    if let Some(hour) = busyness::peak_hour(table, ctx.day()) {
        println!("Busiest today: {hour:02}:00");
    }
    if let Some(profile) = busyness::day_profile(table, ctx.day(), Some(ctx)) {
        for slot in profile {
            let bar = "#".repeat(usize::from(slot.value) / 5);
            let marker = if slot.is_now { " <- now" } else { "" };
            println!("{:02}:00 {:<20} {:>3}%{}", slot.hour, bar, slot.value, marker);
        }
    }
}
