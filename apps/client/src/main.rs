use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hirerig::config::Config;
use hirerig::state::AppState;
use hirerig::store::views;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HireRig client v{}", env!("CARGO_PKG_VERSION"));

    let (state, worker) = AppState::build(config)?;
    let delivery = tokio::spawn(worker.run());

    let session = state.session.restore().await;
    info!("Session: {session:?}");

    let hydration = state.store.hydrate().await;
    if hydration.skipped {
        info!("Not signed in, showing seed data");
    }

    let snapshot = state.store.snapshot();
    let stats = views::project_stats(&snapshot.projects);
    info!(
        "Loaded {} posts, {} jobs, {} users, {} messages, {} projects ({} active)",
        snapshot.posts.len(),
        snapshot.jobs.len(),
        snapshot.users.len(),
        snapshot.messages.len(),
        stats.total,
        stats.active
    );

    // Dropping the last outbox handle lets the worker finish the queue and exit.
    drop(state);
    let report = delivery.await?;
    info!(
        "Outbox drained: {} delivered, {} failed",
        report.delivered, report.failed
    );

    Ok(())
}
