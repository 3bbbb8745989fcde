//! Sticker Guard Library
//!
//! A Discord bot that removes messages carrying banned stickers.
//!
//! This crate provides the core functionality for:
//! - Loading the moderation and periodic policies from the environment
//! - Normalizing inbound messages and deciding on removals
//! - Deleting offending messages and posting a replacement sticker
//! - Posting a designated sticker to a channel on a fixed interval

pub mod config;
pub mod discord;
pub mod filter;
pub mod scheduler;
