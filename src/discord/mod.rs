//! Discord integration module.
//!
//! Provides the [`ModerationApi`] seam used by the filter and the poster, its
//! live implementation on top of serenity, and the gateway event handler.

mod api;
mod client;
mod handler;
mod rest;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{DiscordError, ModerationApi};
pub use client::DiscordBot;
pub use handler::GatewayHandler;
pub use rest::StickerRest;
