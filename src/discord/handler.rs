//! Gateway event handler.

use std::sync::Arc;

use serenity::all::{Context, EventHandler, Message, Ready};
use serenity::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{DiscordBot, StickerRest};
use crate::filter::{InboundMessage, MessageFilter};
use crate::scheduler::PosterMessage;

/// Routes gateway events to the filter and the periodic poster.
#[derive(Debug)]
pub struct GatewayHandler {
    filter: MessageFilter,
    rest: StickerRest,
    poster: Option<mpsc::Sender<PosterMessage>>,
}

impl GatewayHandler {
    /// Creates a handler. `poster` is `None` when periodic posting is disabled.
    #[must_use]
    pub const fn new(
        filter: MessageFilter,
        rest: StickerRest,
        poster: Option<mpsc::Sender<PosterMessage>>,
    ) -> Self {
        Self {
            filter,
            rest,
            poster,
        }
    }
}

#[async_trait]
impl EventHandler for GatewayHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Logged in as {} (id={})", ready.user.name, ready.user.id);

        let Some(poster) = &self.poster else {
            return;
        };

        let api = Arc::new(DiscordBot::from_context(&ctx, &self.rest));
        if poster.send(PosterMessage::Ready(api)).await.is_err() {
            warn!("Periodic poster is no longer running");
        }
    }

    async fn message(&self, ctx: Context, new_message: Message) {
        let event = InboundMessage::from(&new_message);
        let api = DiscordBot::from_context(&ctx, &self.rest);

        let outcome = self.filter.on_message(&api, &event).await;
        debug!(message_id = event.id, ?outcome, "Message handled");
    }
}
