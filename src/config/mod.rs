//! Configuration module for the sticker guard.
//!
//! Handles loading and validation of the Discord credentials and the two
//! process-wide policies (moderation and periodic posting). Everything here
//! is read once at startup and never mutated afterwards.

mod policy;
mod settings;

pub use policy::{MonitoredUsers, ModerationPolicy, PeriodicPolicy, parse_id_list};
pub use settings::{ConfigError, DiscordConfig};

/// Stickers removed when no `BANNED_STICKER_IDS` override is configured.
pub const DEFAULT_BANNED_STICKER_IDS: [u64; 2] = [1_461_152_152_243_142_756, 1_461_253_269_824_471_141];

/// Sticker posted in place of a removed message by default.
pub const DEFAULT_REPLACEMENT_STICKER_ID: u64 = 1_461_235_460_943_642_656;

/// Default periodic interval in hours.
pub const DEFAULT_PERIODIC_HOURS: f64 = 2.0;

/// Default Discord REST base used for the create-message call.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Reads a variable through `lookup`, treating empty or blank values as unset.
pub(crate) fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
