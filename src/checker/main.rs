//! Offline checker for sticker guard configuration.
//!
//! Resolves the environment the bot would start with, prints the effective
//! policies, and optionally dry-runs the filter against message JSON payloads.
//! Makes no network calls.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use sticker_guard::config::{DiscordConfig, ModerationPolicy, MonitoredUsers, PeriodicPolicy};
use sticker_guard::filter::{InboundMessage, MessageFilter, RawMessage, Verdict};

/// Sticker guard configuration checker.
#[derive(Parser, Debug)]
#[command(name = "sticker_guard_check")]
#[command(about = "Validates sticker guard configuration and dry-runs the filter")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Message JSON file to evaluate (a single object or an array). Repeatable.
    #[arg(short, long)]
    message: Vec<String>,

    /// Do not fail when `DISCORD_TOKEN` is unset.
    #[arg(long)]
    allow_missing_token: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        println!("Note: could not load {} ({e}), using process environment", args.env_file);
    }

    let mut failed = false;

    match DiscordConfig::from_env() {
        Ok(config) => println!("✓ Discord token set, REST base: {}", config.api_base),
        Err(e) if args.allow_missing_token => println!("⚠ {e}"),
        Err(e) => {
            eprintln!("✗ {e}");
            failed = true;
        }
    }

    let moderation = match ModerationPolicy::from_env() {
        Ok(policy) => {
            print_moderation(&policy);
            Some(policy)
        }
        Err(e) => {
            eprintln!("✗ {e}");
            failed = true;
            None
        }
    };

    match PeriodicPolicy::from_env() {
        Ok(policy) => print_periodic(&policy),
        Err(e) => {
            eprintln!("✗ {e}");
            failed = true;
        }
    }

    if let Some(policy) = moderation {
        let filter = MessageFilter::new(Arc::new(policy));
        for path in &args.message {
            if !evaluate_file(&filter, path) {
                failed = true;
            }
        }
    }

    println!();
    if failed {
        println!("✗ Configuration check failed");
        ExitCode::FAILURE
    } else {
        println!("✓ Configuration is valid");
        ExitCode::SUCCESS
    }
}

fn print_moderation(policy: &ModerationPolicy) {
    println!("\nModeration:");
    println!("  Banned stickers:  {}", join(&policy.banned_stickers));
    println!("  Replacement:      {}", policy.replacement_sticker);
    match &policy.monitored_users {
        MonitoredUsers::All => println!("  Monitored users:  all"),
        MonitoredUsers::Only(ids) => println!("  Monitored users:  {}", join(ids)),
    }
    if policy.allowed_channels.is_empty() {
        println!("  Channels:         all");
    } else {
        println!("  Channels:         {}", join(&policy.allowed_channels));
    }
}

fn print_periodic(policy: &PeriodicPolicy) {
    println!("\nPeriodic posting:");
    if policy.is_enabled() {
        println!("  Channel:          {}", policy.channel_id);
        println!("  Sticker:          {}", policy.sticker_id);
        println!("  Every:            {:.2} hours", policy.interval.as_secs_f64() / 3600.0);
    } else {
        println!("  disabled (set PERIODIC_CHANNEL_ID and PERIODIC_STICKER_ID)");
    }
}

/// Prints the verdict for every message in `path`. Returns false on read or
/// parse errors.
fn evaluate_file(filter: &MessageFilter, path: &str) -> bool {
    println!("\nMessages in {path}:");

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("  ✗ Failed to read file: {e}");
            return false;
        }
    };

    let parsed: Result<Vec<RawMessage>, _> = match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(serde_json::Value::Array(items)) => items.into_iter().map(serde_json::from_value).collect(),
        Ok(value) => serde_json::from_value(value).map(|m| vec![m]),
        Err(e) => Err(e),
    };

    let messages = match parsed {
        Ok(m) => m,
        Err(e) => {
            eprintln!("  ✗ Failed to parse message JSON: {e}");
            return false;
        }
    };

    for raw in messages {
        let msg = InboundMessage::from(raw);
        match filter.evaluate(&msg) {
            Verdict::Skip(reason) => println!("  [{}] keep ({reason})", msg.id),
            Verdict::Remove { matched } => println!(
                "  [{}] remove (banned: {}), replace with {}",
                msg.id,
                join(&matched),
                filter.policy().replacement_sticker
            ),
        }
    }

    true
}

fn join<'a>(ids: impl IntoIterator<Item = &'a u64>) -> String {
    ids.into_iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
