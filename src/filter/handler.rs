//! Sticker filter: decides on and applies removals.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::InboundMessage;
use crate::config::ModerationPolicy;
use crate::discord::{DiscordError, ModerationApi};

/// Why a message was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    BotAuthor,
    DirectMessage,
    ChannelNotAllowed,
    UserNotMonitored,
    NoStickers,
    NoBannedStickers,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::BotAuthor => "author is a bot",
            Self::DirectMessage => "not sent in a guild",
            Self::ChannelNotAllowed => "channel not in allow-list",
            Self::UserNotMonitored => "author not monitored",
            Self::NoStickers => "no stickers",
            Self::NoBannedStickers => "no banned stickers",
        };
        f.write_str(text)
    }
}

/// Decision for a single message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Leave the message alone.
    Skip(SkipReason),
    /// Delete the message; `matched` holds the banned stickers found on it.
    Remove { matched: BTreeSet<u64> },
}

/// What actually happened to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    Ignored(SkipReason),
    /// Deleted and the replacement sticker was posted.
    Replaced,
    /// Deletion was refused for lack of permissions; nothing else attempted.
    DeleteDenied,
    /// Deletion failed for another reason; nothing else attempted.
    DeleteFailed,
    /// Deleted, but posting the replacement failed.
    ReplacementFailed,
}

/// Applies the moderation policy to inbound messages.
#[derive(Debug, Clone)]
pub struct MessageFilter {
    policy: Arc<ModerationPolicy>,
}

impl MessageFilter {
    /// Creates a filter over a shared policy.
    #[must_use]
    pub const fn new(policy: Arc<ModerationPolicy>) -> Self {
        Self { policy }
    }

    /// Gets a reference to the policy.
    #[must_use]
    pub fn policy(&self) -> &ModerationPolicy {
        &self.policy
    }

    /// Decides what to do with `msg` without touching the platform.
    #[must_use]
    pub fn evaluate(&self, msg: &InboundMessage) -> Verdict {
        if msg.author_is_bot {
            return Verdict::Skip(SkipReason::BotAuthor);
        }
        if msg.is_direct() {
            return Verdict::Skip(SkipReason::DirectMessage);
        }
        if !self.policy.channel_allowed(msg.channel_id) {
            return Verdict::Skip(SkipReason::ChannelNotAllowed);
        }
        if !self.policy.monitored_users.contains(msg.author_id) {
            return Verdict::Skip(SkipReason::UserNotMonitored);
        }
        if msg.sticker_ids.is_empty() {
            return Verdict::Skip(SkipReason::NoStickers);
        }

        let matched: BTreeSet<u64> = msg
            .sticker_ids
            .intersection(&self.policy.banned_stickers)
            .copied()
            .collect();
        if matched.is_empty() {
            return Verdict::Skip(SkipReason::NoBannedStickers);
        }

        Verdict::Remove { matched }
    }

    /// Handles one inbound message: delete it, then post the replacement.
    ///
    /// Failures are logged and reported through the outcome; nothing is
    /// retried or rolled back.
    pub async fn on_message<A>(&self, api: &A, msg: &InboundMessage) -> FilterOutcome
    where
        A: ModerationApi + ?Sized,
    {
        let matched = match self.evaluate(msg) {
            Verdict::Skip(reason) => {
                debug!(message_id = msg.id, %reason, "Ignoring message");
                return FilterOutcome::Ignored(reason);
            }
            Verdict::Remove { matched } => matched,
        };

        info!(
            message_id = msg.id,
            channel_id = msg.channel_id,
            author_id = msg.author_id,
            stickers = ?matched,
            "Removing message with banned sticker"
        );

        match api.delete_message(msg.channel_id, msg.id).await {
            Ok(()) => {}
            Err(DiscordError::MissingPermissions(reason)) => {
                warn!(
                    channel_id = msg.channel_id,
                    "Missing permissions to delete messages here: {}", reason
                );
                return FilterOutcome::DeleteDenied;
            }
            Err(e) => {
                error!(message_id = msg.id, "Failed to delete message: {}", e);
                return FilterOutcome::DeleteFailed;
            }
        }

        let replacement = self.policy.replacement_sticker;
        match api.send_sticker(msg.channel_id, replacement).await {
            Ok(()) => {
                debug!(channel_id = msg.channel_id, sticker_id = replacement, "Replacement posted");
                FilterOutcome::Replaced
            }
            Err(e) => {
                error!(
                    channel_id = msg.channel_id,
                    sticker_id = replacement,
                    "Failed to send replacement sticker: {}", e
                );
                FilterOutcome::ReplacementFailed
            }
        }
    }
}
