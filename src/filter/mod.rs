//! Message filter module.
//!
//! Normalizes inbound messages and removes the ones carrying banned stickers,
//! posting a replacement sticker in their place.

mod handler;
mod message;

pub use handler::{FilterOutcome, MessageFilter, SkipReason, Verdict};
pub use message::{InboundMessage, RawAuthor, RawMessage, RawSticker, collect_sticker_ids};
