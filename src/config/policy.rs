//! Moderation and periodic posting policies.

use std::collections::BTreeSet;
use std::time::Duration;

use super::{
    ConfigError, DEFAULT_BANNED_STICKER_IDS, DEFAULT_PERIODIC_HOURS, DEFAULT_REPLACEMENT_STICKER_ID,
    non_empty,
};

/// Which authors the filter applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitoredUsers {
    /// Every non-bot author is subject to the filter.
    All,
    /// Only the listed authors are subject to the filter.
    Only(BTreeSet<u64>),
}

impl MonitoredUsers {
    /// Builds the monitored set; an empty list means everyone.
    #[must_use]
    pub fn from_ids(ids: BTreeSet<u64>) -> Self {
        if ids.is_empty() { Self::All } else { Self::Only(ids) }
    }

    /// Returns true if messages from `user_id` should be inspected.
    #[must_use]
    pub fn contains(&self, user_id: u64) -> bool {
        match self {
            Self::All => true,
            Self::Only(ids) => ids.contains(&user_id),
        }
    }
}

/// Rules applied to every inbound guild message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationPolicy {
    /// Stickers that cause a message to be removed.
    pub banned_stickers: BTreeSet<u64>,

    /// Sticker posted after a removal.
    pub replacement_sticker: u64,

    /// Authors whose messages are inspected.
    pub monitored_users: MonitoredUsers,

    /// Channels the filter runs in. Empty means all channels.
    pub allowed_channels: BTreeSet<u64>,
}

impl Default for ModerationPolicy {
    fn default() -> Self {
        Self {
            banned_stickers: DEFAULT_BANNED_STICKER_IDS.into_iter().collect(),
            replacement_sticker: DEFAULT_REPLACEMENT_STICKER_ID,
            monitored_users: MonitoredUsers::All,
            allowed_channels: BTreeSet::new(),
        }
    }
}

impl ModerationPolicy {
    /// Creates the policy from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a single-valued id is not a valid integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ModerationPolicy::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let mut users = non_empty(&lookup, "TARGET_USER_IDS")
            .map(|raw| parse_id_list(&raw))
            .unwrap_or_default();
        if let Some(single) = parse_id(&lookup, "TARGET_USER_ID")?.filter(|id| *id != 0) {
            users.insert(single);
        }

        let banned_stickers = non_empty(&lookup, "BANNED_STICKER_IDS")
            .map(|raw| parse_id_list(&raw))
            .filter(|ids| !ids.is_empty())
            .unwrap_or(defaults.banned_stickers);

        let replacement_sticker = parse_id(&lookup, "REPLACEMENT_STICKER_ID")?
            .filter(|id| *id != 0)
            .unwrap_or(defaults.replacement_sticker);

        let allowed_channels = non_empty(&lookup, "ALLOWED_CHANNEL_IDS")
            .map(|raw| parse_id_list(&raw))
            .unwrap_or_default();

        Ok(Self {
            banned_stickers,
            replacement_sticker,
            monitored_users: MonitoredUsers::from_ids(users),
            allowed_channels,
        })
    }

    /// Returns true if the filter runs in `channel_id`.
    #[must_use]
    pub fn channel_allowed(&self, channel_id: u64) -> bool {
        self.allowed_channels.is_empty() || self.allowed_channels.contains(&channel_id)
    }
}

/// Settings for the timed sticker post.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicPolicy {
    /// Channel the sticker is posted to. Zero disables the feature.
    pub channel_id: u64,

    /// Sticker to post. Zero disables the feature.
    pub sticker_id: u64,

    /// Time between posts.
    pub interval: Duration,
}

impl Default for PeriodicPolicy {
    fn default() -> Self {
        Self {
            channel_id: 0,
            sticker_id: 0,
            interval: Duration::from_secs_f64(DEFAULT_PERIODIC_HOURS * 3600.0),
        }
    }
}

impl PeriodicPolicy {
    /// Creates the policy from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an id is not an integer or the interval is not a
    /// positive number of hours.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PeriodicPolicy::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let channel_id = parse_id(&lookup, "PERIODIC_CHANNEL_ID")?.unwrap_or(0);
        let sticker_id = parse_id(&lookup, "PERIODIC_STICKER_ID")?.unwrap_or(0);

        let hours = match non_empty(&lookup, "PERIODIC_EVERY_HOURS") {
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|h| h.is_finite() && *h > 0.0)
                .ok_or(ConfigError::InvalidInterval(raw))?,
            None => DEFAULT_PERIODIC_HOURS,
        };

        let interval = Duration::try_from_secs_f64(hours * 3600.0)
            .map_err(|_| ConfigError::InvalidInterval(hours.to_string()))?;
        if interval.is_zero() {
            return Err(ConfigError::InvalidInterval(hours.to_string()));
        }

        Ok(Self {
            channel_id,
            sticker_id,
            interval,
        })
    }

    /// Returns true if both the channel and the sticker are configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.channel_id != 0 && self.sticker_id != 0
    }
}

/// Parses a comma/space separated list of ids, skipping entries that are not
/// integers.
#[must_use]
pub fn parse_id_list(raw: &str) -> BTreeSet<u64> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter_map(|part| part.parse().ok())
        .collect()
}

fn parse_id(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<u64>, ConfigError> {
    non_empty(lookup, key)
        .map(|raw| {
            raw.parse()
                .map_err(|_| ConfigError::InvalidId { key, value: raw })
        })
        .transpose()
}
