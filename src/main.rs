//! Sticker Guard - Main Entry Point
//!
//! A Discord bot that replaces banned stickers and optionally posts a sticker
//! to a fixed channel on a timer.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serenity::Client;
use serenity::all::GatewayIntents;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use sticker_guard::config::{DiscordConfig, ModerationPolicy, MonitoredUsers, PeriodicPolicy};
use sticker_guard::discord::{GatewayHandler, StickerRest};
use sticker_guard::filter::MessageFilter;
use sticker_guard::scheduler::{PeriodicPoster, PosterMessage};

/// Discord bot that replaces banned stickers.
#[derive(Parser, Debug)]
#[command(name = "sticker_guard")]
#[command(about = "Replace banned Discord stickers and post a sticker on a timer")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    // Load configurations
    let discord = DiscordConfig::from_env()
        .context("Failed to load Discord configuration from environment")?;
    let moderation =
        Arc::new(ModerationPolicy::from_env().context("Failed to load moderation policy")?);
    let periodic =
        Arc::new(PeriodicPolicy::from_env().context("Failed to load periodic policy")?);

    log_policies(&moderation, &periodic);

    let rest = StickerRest::new(&discord);
    let poster = Arc::new(PeriodicPoster::new(Arc::clone(&periodic)));

    // Spawn the periodic poster; it waits for the ready event
    let (poster_tx, poster_handle) = if periodic.is_enabled() {
        let (tx, rx) = mpsc::channel::<PosterMessage>(8);
        let poster = Arc::clone(&poster);
        let handle = tokio::spawn(async move {
            poster.run(rx).await;
        });
        (Some(tx), Some(handle))
    } else {
        (None, None)
    };

    let handler = GatewayHandler::new(MessageFilter::new(moderation), rest, poster_tx.clone());

    // Connect to Discord
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES;
    let mut client = Client::builder(&discord.token, intents)
        .event_handler(handler)
        .await
        .context("Failed to create Discord client")?;

    let shard_manager = Arc::clone(&client.shard_manager);

    info!("Starting sticker guard...");

    // Run until the gateway stops or Ctrl+C
    tokio::select! {
        result = client.start() => {
            result.context("Discord gateway client stopped")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }

    // Cleanup
    info!("Shutting down...");
    shard_manager.shutdown_all().await;
    if let Some(tx) = poster_tx {
        let _ = tx.send(PosterMessage::Shutdown).await;
    }
    if let Some(handle) = poster_handle {
        let _ = handle.await;
    }

    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Logs the effective policies at startup.
fn log_policies(moderation: &ModerationPolicy, periodic: &PeriodicPolicy) {
    info!(
        "Banned stickers: {:?}, replacement: {}",
        moderation.banned_stickers, moderation.replacement_sticker
    );

    match &moderation.monitored_users {
        MonitoredUsers::All => info!("Monitoring all users"),
        MonitoredUsers::Only(ids) => info!("Monitoring users: {:?}", ids),
    }

    if moderation.allowed_channels.is_empty() {
        info!("Filtering in all channels");
    } else {
        info!("Filtering in channels: {:?}", moderation.allowed_channels);
    }

    if periodic.is_enabled() {
        info!(
            "Periodic sticker {} to channel {} every {:?}",
            periodic.sticker_id, periodic.channel_id, periodic.interval
        );
    } else {
        info!("Periodic sticker posting disabled");
    }
}
