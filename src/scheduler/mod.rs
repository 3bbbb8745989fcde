//! Periodic sticker scheduler module.
//!
//! Posts a configured sticker to a configured channel on a fixed interval,
//! starting once the gateway reports ready.

mod runner;
mod state;

pub use runner::{PeriodicPoster, PosterMessage, TickOutcome};
pub use state::PosterState;
