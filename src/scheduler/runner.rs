//! Periodic sticker poster.
//!
//! The poster follows a simple state machine:
//! 1. `Disabled` if the channel or sticker id is zero; `run` returns at once
//! 2. `Idle` until the first ready signal arrives with a platform handle
//! 3. `Running`: post on every interval tick until shutdown
//!
//! Each tick resolves the channel, then posts the sticker. A failure at either
//! step is logged and the tick is dropped; the next tick proceeds as normal.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, mpsc};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

use super::PosterState;
use crate::config::PeriodicPolicy;
use crate::discord::ModerationApi;

/// Messages that can be sent to the poster.
#[derive(Clone)]
pub enum PosterMessage {
    /// The gateway is ready; start posting through this handle.
    Ready(Arc<dyn ModerationApi>),
    /// Stop the poster.
    Shutdown,
}

impl std::fmt::Debug for PosterMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(_) => f.write_str("Ready"),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Posted,
    ChannelUnavailable,
    PostFailed,
}

/// Posts one sticker to one channel on a fixed interval.
#[derive(Debug)]
pub struct PeriodicPoster {
    /// Target channel, sticker and interval.
    policy: Arc<PeriodicPolicy>,

    /// Lifecycle state.
    state: RwLock<PosterState>,
}

impl PeriodicPoster {
    /// Creates a poster; it starts `Disabled` unless both ids are configured.
    #[must_use]
    pub fn new(policy: Arc<PeriodicPolicy>) -> Self {
        let state = if policy.is_enabled() {
            PosterState::Idle
        } else {
            PosterState::Disabled
        };

        Self {
            policy,
            state: RwLock::new(state),
        }
    }

    /// Returns the current lifecycle state.
    pub async fn state(&self) -> PosterState {
        *self.state.read().await
    }

    /// Runs the poster loop.
    pub async fn run(&self, mut rx: mpsc::Receiver<PosterMessage>) {
        if self.state().await == PosterState::Disabled {
            debug!("Periodic poster disabled");
            return;
        }

        let api = loop {
            match rx.recv().await {
                Some(PosterMessage::Ready(api)) => {
                    if self.state.write().await.on_ready() {
                        break api;
                    }
                }
                Some(PosterMessage::Shutdown) | None => {
                    info!("Periodic poster stopped before ready");
                    return;
                }
            }
        };

        info!(
            channel_id = self.policy.channel_id,
            sticker_id = self.policy.sticker_id,
            "Periodic poster started, every {}",
            format_interval(self.policy.interval)
        );

        let mut timer = interval(self.policy.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    self.on_tick(api.as_ref()).await;
                    debug!("Next periodic post at {}", next_post_at(self.policy.interval));
                }
                msg = rx.recv() => {
                    match msg {
                        Some(PosterMessage::Ready(_)) => {
                            debug!("Ready received while running, ignoring");
                        }
                        Some(PosterMessage::Shutdown) | None => {
                            info!("Periodic poster shutting down");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Single tick: resolve the channel, then post the sticker.
    pub async fn on_tick<A>(&self, api: &A) -> TickOutcome
    where
        A: ModerationApi + ?Sized,
    {
        let channel_id = match api.resolve_channel(self.policy.channel_id).await {
            Ok(id) => id,
            Err(e) => {
                warn!(
                    channel_id = self.policy.channel_id,
                    "Failed to fetch periodic channel: {}", e
                );
                return TickOutcome::ChannelUnavailable;
            }
        };

        match api.send_sticker(channel_id, self.policy.sticker_id).await {
            Ok(()) => {
                info!(channel_id, sticker_id = self.policy.sticker_id, "Periodic sticker posted");
                TickOutcome::Posted
            }
            Err(e) => {
                error!(channel_id, "Failed to send periodic sticker: {}", e);
                TickOutcome::PostFailed
            }
        }
    }
}

/// Formats an interval as hours, minutes and seconds for display.
fn format_interval(interval: Duration) -> String {
    let total = interval.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    match (hours, minutes, seconds) {
        (0, 0, s) => format!("{s}s"),
        (0, m, 0) => format!("{m}m"),
        (h, 0, 0) => format!("{h}h"),
        (h, m, s) => format!("{h}h{m:02}m{s:02}s"),
    }
}

/// Wall-clock time of the next tick, for logging.
fn next_post_at(interval: Duration) -> String {
    chrono::Duration::from_std(interval)
        .ok()
        .and_then(|d| chrono::Local::now().checked_add_signed(d))
        .map_or_else(|| "unknown".to_owned(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discord::DiscordError;
    use crate::discord::testing::{ApiCall, RecordingApi};

    const HOUR: Duration = Duration::from_secs(3600);

    fn policy(channel_id: u64, sticker_id: u64) -> Arc<PeriodicPolicy> {
        Arc::new(PeriodicPolicy {
            channel_id,
            sticker_id,
            interval: 2 * HOUR,
        })
    }

    fn spawn_poster(
        poster: Arc<PeriodicPoster>,
    ) -> (mpsc::Sender<PosterMessage>, tokio::task::JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(async move { poster.run(rx).await });
        (tx, handle)
    }

    #[tokio::test]
    async fn test_disabled_without_both_ids() {
        let poster = PeriodicPoster::new(policy(0, 5));
        assert_eq!(poster.state().await, PosterState::Disabled);

        let poster = PeriodicPoster::new(policy(5, 0));
        assert_eq!(poster.state().await, PosterState::Disabled);

        let (_tx, rx) = mpsc::channel(1);
        poster.run(rx).await;
        assert_eq!(poster.state().await, PosterState::Disabled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_until_ready_then_periodic() {
        let api = Arc::new(RecordingApi::new());
        let poster = Arc::new(PeriodicPoster::new(policy(10, 20)));
        assert_eq!(poster.state().await, PosterState::Idle);

        let (tx, handle) = spawn_poster(Arc::clone(&poster));

        tokio::time::sleep(10 * HOUR).await;
        assert!(api.calls().is_empty());
        assert_eq!(poster.state().await, PosterState::Idle);

        tx.send(PosterMessage::Ready(api.clone())).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(poster.state().await, PosterState::Running);
        assert_eq!(
            api.calls(),
            vec![
                ApiCall::ResolveChannel { channel_id: 10 },
                ApiCall::SendSticker { channel_id: 10, sticker_id: 20 },
            ]
        );

        tokio::time::sleep(2 * HOUR).await;
        assert_eq!(api.sent_stickers(), 2);

        tokio::time::sleep(4 * HOUR).await;
        assert_eq!(api.sent_stickers(), 4);

        tx.send(PosterMessage::Shutdown).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_channel_failure_does_not_stop_ticks() {
        let api = Arc::new(
            RecordingApi::new().fail_resolve(DiscordError::Api {
                status: 404,
                body: "Unknown Channel".to_owned(),
            }),
        );
        let poster = Arc::new(PeriodicPoster::new(policy(10, 20)));
        let (tx, handle) = spawn_poster(poster);

        tx.send(PosterMessage::Ready(api.clone())).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(api.calls(), vec![ApiCall::ResolveChannel { channel_id: 10 }]);

        tokio::time::sleep(2 * HOUR).await;
        assert_eq!(api.sent_stickers(), 1);

        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_ready_is_ignored() {
        let api = Arc::new(RecordingApi::new());
        let poster = Arc::new(PeriodicPoster::new(policy(10, 20)));
        let (tx, handle) = spawn_poster(poster);

        tx.send(PosterMessage::Ready(api.clone())).await.unwrap();
        tx.send(PosterMessage::Ready(api.clone())).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(api.sent_stickers(), 1);

        tx.send(PosterMessage::Shutdown).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_before_ready() {
        let poster = Arc::new(PeriodicPoster::new(policy(10, 20)));
        let (tx, handle) = spawn_poster(Arc::clone(&poster));

        tx.send(PosterMessage::Shutdown).await.unwrap();
        handle.await.unwrap();
        assert_eq!(poster.state().await, PosterState::Idle);
    }

    #[tokio::test]
    async fn test_tick_post_failure() {
        let api = RecordingApi::new().fail_send(DiscordError::Transport("reset".to_owned()));
        let poster = PeriodicPoster::new(policy(10, 20));

        assert_eq!(poster.on_tick(&api).await, TickOutcome::PostFailed);
        assert_eq!(poster.on_tick(&api).await, TickOutcome::Posted);
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(2 * HOUR), "2h");
        assert_eq!(format_interval(Duration::from_secs(1800)), "30m");
        assert_eq!(format_interval(Duration::from_secs(45)), "45s");
        assert_eq!(format_interval(Duration::from_secs(5430)), "1h30m30s");
    }
}
