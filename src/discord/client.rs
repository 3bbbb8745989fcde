//! Live [`ModerationApi`] backed by serenity and the sticker REST call.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{ChannelId, MessageId};
use serenity::cache::Cache;
use serenity::client::Context;
use serenity::http::Http;
use tracing::debug;

use super::{DiscordError, ModerationApi, StickerRest};

/// Handle to the connected bot.
///
/// Cheap to clone: every field is a shared handle owned by the gateway client.
#[derive(Clone)]
pub struct DiscordBot {
    http: Arc<Http>,
    cache: Arc<Cache>,
    rest: StickerRest,
}

impl DiscordBot {
    /// Creates a handle from explicit parts.
    #[must_use]
    pub const fn new(http: Arc<Http>, cache: Arc<Cache>, rest: StickerRest) -> Self {
        Self { http, cache, rest }
    }

    /// Creates a handle from an event context.
    #[must_use]
    pub fn from_context(ctx: &Context, rest: &StickerRest) -> Self {
        Self::new(Arc::clone(&ctx.http), Arc::clone(&ctx.cache), rest.clone())
    }
}

#[async_trait]
impl ModerationApi for DiscordBot {
    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), DiscordError> {
        ChannelId::new(channel_id)
            .delete_message(&self.http, MessageId::new(message_id))
            .await?;
        Ok(())
    }

    async fn send_sticker(&self, channel_id: u64, sticker_id: u64) -> Result<(), DiscordError> {
        self.rest.send_sticker(channel_id, sticker_id).await
    }

    async fn resolve_channel(&self, channel_id: u64) -> Result<u64, DiscordError> {
        let id = ChannelId::new(channel_id);
        if self.cache.channel(id).is_some() {
            return Ok(channel_id);
        }

        debug!(channel_id, "Channel not cached, fetching");
        let channel = self.http.get_channel(id).await?;
        Ok(channel.id().get())
    }
}

impl std::fmt::Debug for DiscordBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordBot")
            .field("rest", &self.rest)
            .finish_non_exhaustive()
    }
}
