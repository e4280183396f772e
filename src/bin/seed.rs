//! Seed script - wipes the configured store and fills it with demo data
//!
//! Run with:
//! ```
//! STORE_BACKEND=firestore cargo run --bin seed
//! ```
//!
//! Set `SEED_RNG_SEED` to an integer for reproducible activity data.

use chrono::Utc;
use octofit_tracker::config::Config;
use octofit_tracker::db::open_store;
use octofit_tracker::services::{seed_database, SeedPlan};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let db = open_store(&config).await?;
    tracing::info!(store = ?config.store_backend, "Connected to store");

    let mut rng = match std::env::var("SEED_RNG_SEED") {
        Ok(raw) => StdRng::seed_from_u64(raw.trim().parse()?),
        Err(_) => StdRng::from_entropy(),
    };

    let plan = SeedPlan::generate(&mut rng, Utc::now());
    let summary = seed_database(db.as_ref(), plan).await?;

    // Summary output
    tracing::info!("Seed completed!");
    tracing::info!("  Teams: {}", summary.teams);
    tracing::info!("  Users: {}", summary.users);
    tracing::info!("  Activities: {}", summary.activities);
    tracing::info!("  Leaderboard entries: {}", summary.leaderboard_entries);
    tracing::info!("  Workouts: {}", summary.workouts);

    Ok(())
}
