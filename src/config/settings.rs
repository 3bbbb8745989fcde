//! Discord credentials and connection settings.

use std::fmt;

use super::{DEFAULT_API_BASE, non_empty};

/// Discord connection configuration.
#[derive(Clone)]
pub struct DiscordConfig {
    /// Bot token (obtain from the Discord developer portal).
    pub token: String,

    /// REST base URL for the create-message call.
    pub api_base: String,
}

impl DiscordConfig {
    /// Creates a new Discord configuration with the default REST base.
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            token,
            api_base: DEFAULT_API_BASE.to_owned(),
        }
    }

    /// Creates configuration from environment variables.
    ///
    /// Expects `DISCORD_TOKEN` to be set. `DISCORD_API_BASE` is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DiscordConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token =
            non_empty(&lookup, "DISCORD_TOKEN").ok_or(ConfigError::MissingEnvVar("DISCORD_TOKEN"))?;

        let api_base = non_empty(&lookup, "DISCORD_API_BASE")
            .map_or_else(|| DEFAULT_API_BASE.to_owned(), |s| s.trim_end_matches('/').to_owned());

        Ok(Self { token, api_base })
    }
}

impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &mask_token(&self.token))
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Masks a bot token for logging (shows last 4 characters).
fn mask_token(token: &str) -> String {
    let count = token.chars().count();
    if count > 8 {
        let tail: String = token.chars().skip(count - 4).collect();
        format!("***{tail}")
    } else {
        "****".to_owned()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid value for {key}: {value:?} (must be a non-negative integer)")]
    InvalidId { key: &'static str, value: String },

    #[error("Invalid value for PERIODIC_EVERY_HOURS: {0:?} (must be a positive number)")]
    InvalidInterval(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_token_required() {
        let err = DiscordConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar("DISCORD_TOKEN")));

        let err = DiscordConfig::from_lookup(lookup(&[("DISCORD_TOKEN", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar("DISCORD_TOKEN")));
    }

    #[test]
    fn test_api_base_default_and_override() {
        let config = DiscordConfig::from_lookup(lookup(&[("DISCORD_TOKEN", "abc")])).unwrap();
        assert_eq!(config.api_base, "https://discord.com/api/v10");

        let config = DiscordConfig::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "abc"),
            ("DISCORD_API_BASE", "http://localhost:8080/api/"),
        ]))
        .unwrap();
        assert_eq!(config.api_base, "http://localhost:8080/api");
    }

    #[test]
    fn test_debug_masks_token() {
        let config = DiscordConfig::new("MTIzNDU2Nzg5.secret.tail".to_owned());
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("***tail"));
        assert_eq!(mask_token("short"), "****");
    }
}
