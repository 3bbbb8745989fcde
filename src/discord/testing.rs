//! Recording test double for [`ModerationApi`].

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{DiscordError, ModerationApi};

/// A call observed by [`RecordingApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Delete { channel_id: u64, message_id: u64 },
    SendSticker { channel_id: u64, sticker_id: u64 },
    ResolveChannel { channel_id: u64 },
}

/// Records every call in order. Queued failures are returned by the next
/// matching call, one per call.
#[derive(Debug, Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<ApiCall>>,
    delete_failures: Mutex<VecDeque<DiscordError>>,
    send_failures: Mutex<VecDeque<DiscordError>>,
    resolve_failures: Mutex<VecDeque<DiscordError>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_delete(self, err: DiscordError) -> Self {
        self.delete_failures.lock().unwrap().push_back(err);
        self
    }

    pub fn fail_send(self, err: DiscordError) -> Self {
        self.send_failures.lock().unwrap().push_back(err);
        self
    }

    pub fn fail_resolve(self, err: DiscordError) -> Self {
        self.resolve_failures.lock().unwrap().push_back(err);
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sent_stickers(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ApiCall::SendSticker { .. }))
            .count()
    }

    fn record(&self, call: ApiCall, failures: &Mutex<VecDeque<DiscordError>>) -> Result<(), DiscordError> {
        self.calls.lock().unwrap().push(call);
        failures.lock().unwrap().pop_front().map_or(Ok(()), Err)
    }
}

#[async_trait]
impl ModerationApi for RecordingApi {
    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), DiscordError> {
        self.record(
            ApiCall::Delete { channel_id, message_id },
            &self.delete_failures,
        )
    }

    async fn send_sticker(&self, channel_id: u64, sticker_id: u64) -> Result<(), DiscordError> {
        self.record(
            ApiCall::SendSticker { channel_id, sticker_id },
            &self.send_failures,
        )
    }

    async fn resolve_channel(&self, channel_id: u64) -> Result<u64, DiscordError> {
        self.record(ApiCall::ResolveChannel { channel_id }, &self.resolve_failures)
            .map(|()| channel_id)
    }
}
