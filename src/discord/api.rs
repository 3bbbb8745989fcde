//! Platform operations the filter and the poster depend on.

use async_trait::async_trait;
use serenity::http::HttpError;
use thiserror::Error;

/// Errors that can occur while talking to Discord.
#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("Missing permissions: {0}")]
    MissingPermissions(String),

    #[error("Discord API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP transport error: {0}")]
    Transport(String),

    #[error("Discord client error: {0}")]
    Client(String),
}

impl From<serenity::Error> for DiscordError {
    fn from(err: serenity::Error) -> Self {
        if let serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) = &err {
            let status = response.status_code.as_u16();
            let body = response.error.message.clone();
            if status == 403 {
                return Self::MissingPermissions(body);
            }
            return Self::Api { status, body };
        }

        Self::Client(err.to_string())
    }
}

impl From<reqwest::Error> for DiscordError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// The subset of Discord the moderation core needs.
///
/// Implemented by [`super::DiscordBot`] against the live platform. Every call is
/// attempted exactly once; callers decide how to report failures.
#[async_trait]
pub trait ModerationApi: Send + Sync {
    /// Deletes one message.
    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), DiscordError>;

    /// Posts a message carrying exactly one sticker.
    async fn send_sticker(&self, channel_id: u64, sticker_id: u64) -> Result<(), DiscordError>;

    /// Resolves a channel from the local cache, falling back to a REST fetch.
    async fn resolve_channel(&self, channel_id: u64) -> Result<u64, DiscordError>;
}
