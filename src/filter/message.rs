//! Inbound message model and its wire representations.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer};

/// A message as seen by the filter.
///
/// Built once at the ingestion boundary; sticker metadata from every supported
/// representation is already folded into `sticker_ids`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Message id.
    pub id: u64,

    /// Author id.
    pub author_id: u64,

    /// Whether the author is a bot account.
    pub author_is_bot: bool,

    /// Guild the message was sent in, `None` for direct messages.
    pub guild_id: Option<u64>,

    /// Channel the message was sent in.
    pub channel_id: u64,

    /// Distinct sticker ids attached to the message.
    pub sticker_ids: BTreeSet<u64>,
}

impl InboundMessage {
    /// Returns true if the message was sent outside a guild.
    #[must_use]
    pub const fn is_direct(&self) -> bool {
        self.guild_id.is_none()
    }
}

impl From<&serenity::model::channel::Message> for InboundMessage {
    fn from(msg: &serenity::model::channel::Message) -> Self {
        Self {
            id: msg.id.get(),
            author_id: msg.author.id.get(),
            author_is_bot: msg.author.bot,
            guild_id: msg.guild_id.map(|id| id.get()),
            channel_id: msg.channel_id.get(),
            // serenity drops the legacy `stickers` field while parsing
            sticker_ids: collect_sticker_ids(
                msg.sticker_items.iter().map(|s| Some(s.id.get())),
                std::iter::empty(),
            ),
        }
    }
}

/// Unions sticker ids from the current and the legacy sticker fields.
/// Entries without an id are skipped; duplicates collapse.
pub fn collect_sticker_ids<I, L>(items: I, legacy: L) -> BTreeSet<u64>
where
    I: IntoIterator<Item = Option<u64>>,
    L: IntoIterator<Item = Option<u64>>,
{
    items.into_iter().chain(legacy).flatten().collect()
}

/// Discord message JSON payload.
///
/// Older payloads carry full sticker objects under `stickers`, newer ones carry
/// `sticker_items`. Both are accepted and merged on conversion.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMessage {
    #[serde(deserialize_with = "snowflake")]
    pub id: u64,

    #[serde(deserialize_with = "snowflake")]
    pub channel_id: u64,

    #[serde(default, deserialize_with = "optional_snowflake")]
    pub guild_id: Option<u64>,

    pub author: RawAuthor,

    #[serde(default)]
    pub sticker_items: Option<Vec<RawSticker>>,

    #[serde(default)]
    pub stickers: Option<Vec<RawSticker>>,
}

/// Author part of a [`RawMessage`].
#[derive(Debug, Clone, Deserialize)]
pub struct RawAuthor {
    #[serde(deserialize_with = "snowflake")]
    pub id: u64,

    #[serde(default)]
    pub bot: Option<bool>,
}

/// Sticker entry of a [`RawMessage`]. Entries without an id are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSticker {
    #[serde(default, deserialize_with = "optional_snowflake")]
    pub id: Option<u64>,
}

impl From<RawMessage> for InboundMessage {
    fn from(raw: RawMessage) -> Self {
        let sticker_ids = collect_sticker_ids(
            raw.sticker_items.iter().flatten().map(|s| s.id),
            raw.stickers.iter().flatten().map(|s| s.id),
        );

        Self {
            id: raw.id,
            author_id: raw.author.id,
            author_is_bot: raw.author.bot.unwrap_or(false),
            guild_id: raw.guild_id,
            channel_id: raw.channel_id,
            sticker_ids,
        }
    }
}

/// Discord sends snowflakes as strings; numbers are accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum Snowflake {
    Number(u64),
    Text(String),
}

impl Snowflake {
    fn into_id<E: serde::de::Error>(self) -> Result<u64, E> {
        match self {
            Self::Number(id) => Ok(id),
            Self::Text(s) => s
                .parse()
                .map_err(|_| E::custom(format!("invalid snowflake: {s:?}"))),
        }
    }
}

fn snowflake<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Snowflake::deserialize(deserializer)?.into_id()
}

fn optional_snowflake<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Option::<Snowflake>::deserialize(deserializer)?
        .map(Snowflake::into_id)
        .transpose()
}
