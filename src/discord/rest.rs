//! Direct REST call for posting stickers.

use serde::Serialize;
use tracing::debug;

use super::DiscordError;
use crate::config::DiscordConfig;

#[derive(Debug, Serialize)]
struct CreateMessage {
    sticker_ids: [u64; 1],
}

/// Posts sticker-only messages through the create-message endpoint.
#[derive(Clone)]
pub struct StickerRest {
    client: reqwest::Client,
    token: String,
    api_base: String,
}

impl StickerRest {
    /// Creates a sender authenticated with the bot token.
    #[must_use]
    pub fn new(config: &DiscordConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: config.token.clone(),
            api_base: config.api_base.clone(),
        }
    }

    /// Posts a message containing `sticker_id` to `channel_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscordError::Api`] with the response text for any status
    /// of 400 or above, [`DiscordError::Transport`] if the request never
    /// completed.
    pub async fn send_sticker(&self, channel_id: u64, sticker_id: u64) -> Result<(), DiscordError> {
        let url = format!("{}/channels/{channel_id}/messages", self.api_base);
        debug!(channel_id, sticker_id, "Posting sticker");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bot {}", self.token))
            .json(&CreateMessage {
                sticker_ids: [sticker_id],
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(DiscordError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

impl std::fmt::Debug for StickerRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StickerRest")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    fn rest_for(server: &mockito::Server) -> StickerRest {
        let mut config = DiscordConfig::new("test-token".to_owned());
        config.api_base = server.url();
        StickerRest::new(&config)
    }

    #[tokio::test]
    async fn test_send_sticker_posts_single_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/channels/42/messages")
            .match_header("authorization", "Bot test-token")
            .match_body(Matcher::Json(serde_json::json!({
                "sticker_ids": [1_461_235_460_943_642_656_u64]
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        rest_for(&server)
            .send_sticker(42, 1_461_235_460_943_642_656)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_sticker_reports_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/channels/7/messages")
            .with_status(400)
            .with_body(r#"{"message":"Invalid Form Body","code":50035}"#)
            .create_async()
            .await;

        let err = rest_for(&server).send_sticker(7, 1).await.unwrap_err();
        match err {
            DiscordError::Api { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("Invalid Form Body"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_send_sticker_transport_failure() {
        let mut config = DiscordConfig::new("t".to_owned());
        config.api_base = "http://127.0.0.1:1".to_owned();

        let err = StickerRest::new(&config).send_sticker(1, 1).await.unwrap_err();
        assert!(matches!(err, DiscordError::Transport(_)));
    }
}
