mod app;
mod classifier;
mod config;
mod discord;
mod entity;
mod error;
mod llm;
mod orchestrator;
mod session;
mod store;
#[cfg(test)]
mod testing;
mod video;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::load()?;

    let stores = store::create_stores(&config).await?;
    let orchestrator = llm::create_backend(&config.llm)?
        .map(|backend| Arc::new(orchestrator::Orchestrator::new(backend, config.llm.dish_name)));
    let classifier = classifier::create_classifier(&config.classifier);
    let videos = Arc::new(video::VideoLookup::new(Arc::new(
        video::YouTubeSearch::default(),
    )));

    let app = app::App::new(app::Services {
        recipes: stores.recipes,
        inventory: stores.inventory,
        orchestrator,
        classifier,
        videos,
    });

    let discord_bot = discord::Bot::new(config.discord_token.clone(), app)?;

    let bot_handle = tokio::spawn(async move {
        if let Err(e) = discord_bot.start().await {
            tracing::error!("Discord bot error: {}", e);
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    bot_handle.abort();
    info!("Shutdown complete");

    Ok(())
}
