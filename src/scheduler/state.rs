//! Periodic poster state.

/// Lifecycle of the periodic poster.
///
/// `Disabled` is terminal. `Idle` moves to `Running` once, on the first ready
/// signal, and `Running` lasts until shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterState {
    /// Channel or sticker not configured; no timer is ever armed.
    Disabled,
    /// Waiting for the gateway to report ready.
    Idle,
    /// Posting on every interval tick.
    Running,
}

impl PosterState {
    /// Applies a ready signal, returning true if the poster should start now.
    pub fn on_ready(&mut self) -> bool {
        match self {
            Self::Idle => {
                *self = Self::Running;
                true
            }
            Self::Disabled | Self::Running => false,
        }
    }
}
