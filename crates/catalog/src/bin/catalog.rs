use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use catalog::{CatalogClient, client, sync::sync_courses};
use clap::{Parser, Subcommand};
use storage::{
    Database,
    repository::{CourseStore, ReviewStore},
    services::{
        aggregation::aggregate_course_stats,
        recency::{DEFAULT_WINDOW_BUFFER, DEFAULT_WINDOW_SIZE, RecencyWindow},
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "OMSHub course catalog and review statistics tools", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the static course catalog and upsert it into the database
    Sync {
        #[arg(long, env = "CATALOG_BASE_URL", default_value = client::DEFAULT_BASE_URL)]
        base_url: String,
    },
    /// Write per-course review statistics keyed by course id
    Stats {
        #[arg(long, default_value = "./data/courses-stats.json")]
        output: PathBuf,
    },
    /// Write the recency window (global and per course)
    Recents {
        #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE)]
        size: usize,

        #[arg(long, default_value_t = DEFAULT_WINDOW_BUFFER)]
        buffer: usize,

        #[arg(long, default_value = "./data/recents.json")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("catalog={},storage={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Connecting to database...");
    let db = Database::new(&cli.database_url)
        .await
        .context("Failed to connect to database")?;
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;

    match cli.command {
        Commands::Sync { base_url } => handle_sync(&db, base_url).await?,
        Commands::Stats { output } => handle_stats(&db, output).await?,
        Commands::Recents {
            size,
            buffer,
            output,
        } => handle_recents(&db, size, buffer, output).await?,
    }

    Ok(())
}

async fn handle_sync(db: &Database, base_url: String) -> anyhow::Result<()> {
    tracing::info!("Syncing course catalog from {}", base_url);

    // Single run, nothing to reuse a cache for
    let client = CatalogClient::new(base_url, Duration::ZERO)?;
    let written = sync_courses(&client, db).await?;

    tracing::info!("✓ Synced {} courses", written);
    Ok(())
}

async fn handle_stats(db: &Database, output: PathBuf) -> anyhow::Result<()> {
    let courses = db.list_courses().await?;
    let reviews = db.list_all_reviews().await?;
    tracing::info!(
        "Aggregating {} reviews across {} courses",
        reviews.len(),
        courses.len()
    );

    let stats = aggregate_course_stats(courses.into_iter().map(|c| c.course_id), &reviews);
    let rounded: std::collections::BTreeMap<_, _> = stats
        .into_iter()
        .map(|(id, s)| (id, s.rounded()))
        .collect();

    write_json(&output, &rounded).await?;
    tracing::info!("✓ Wrote statistics to {}", output.display());
    Ok(())
}

async fn handle_recents(
    db: &Database,
    size: usize,
    buffer: usize,
    output: PathBuf,
) -> anyhow::Result<()> {
    let reviews = db.list_all_reviews().await?;
    let window = RecencyWindow::rebuild(reviews, size, buffer);
    tracing::info!(
        "Recency window holds {} reviews across {} courses",
        window.reviews.len(),
        window.by_course.len()
    );

    write_json(&output, &window).await?;
    tracing::info!("✓ Wrote recents to {}", output.display());
    Ok(())
}

async fn write_json<T: serde::Serialize>(path: &PathBuf, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
