//! Broadcast-channel progress publisher.
//!
//! Fans progress events out to in-process subscribers (e.g. a server-push
//! stream handler) over per-job `tokio::sync::broadcast` channels. Delivery
//! is best-effort: publishing to a channel with no subscribers, or one
//! whose subscribers have lagged, never fails the producer.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::StorageResult;
use crate::storage_traits::{ProgressEvent, ProgressPublisher};

const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Per-job broadcast fan-out of progress events, serialized as JSON lines.
pub struct BroadcastProgressPublisher {
    channels: Mutex<HashMap<Uuid, broadcast::Sender<String>>>,
    capacity: usize,
}

impl BroadcastProgressPublisher {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    /// Subscribe to a job's channel, creating it if needed.
    ///
    /// Slow subscribers miss events once the channel buffer wraps; they
    /// should poll the job row to resynchronise.
    pub fn subscribe(&self, job_id: Uuid) -> broadcast::Receiver<String> {
        let mut channels = self.channels.lock().unwrap();
        channels
            .entry(job_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Drop a finished job's channel.
    pub fn remove(&self, job_id: Uuid) {
        self.channels.lock().unwrap().remove(&job_id);
    }
}

impl Default for BroadcastProgressPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProgressPublisher for BroadcastProgressPublisher {
    async fn publish(&self, job_id: Uuid, event: ProgressEvent) -> StorageResult<()> {
        let payload = serde_json::to_string(&event)?;
        let sender = {
            let mut channels = self.channels.lock().unwrap();
            channels
                .entry(job_id)
                .or_insert_with(|| broadcast::channel(self.capacity).0)
                .clone()
        };
        // A send error only means there are no subscribers right now.
        let _ = sender.send(payload);
        Ok(())
    }
}
