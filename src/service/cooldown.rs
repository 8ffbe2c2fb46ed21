//! Per-user quiet period between trigger replies.

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{sync::Mutex, time::Instant};
use tracing::debug;

use crate::base::types::CooldownStatus;

use super::schedule::ScheduledTask;

/// Tracks when each user's cooldown window ends.
///
/// Each user has at most one record. A record is armed on an allowed check and
/// removed by an eviction timer when its window elapses; a throttled check
/// neither extends the window nor re-arms the timer.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Debug, Clone)]
pub struct CooldownTracker {
    window: Duration,
    records: Arc<Mutex<HashMap<u64, Instant>>>,
}

impl CooldownTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            records: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Checks `user_id` and, when allowed, opens a new window for them.
    pub async fn check(&self, user_id: u64) -> CooldownStatus {
        let now = Instant::now();
        let mut records = self.records.lock().await;

        // An elapsed record whose timer has not fired yet counts as absent.
        if let Some(&expires_at) = records.get(&user_id)
            && now < expires_at
        {
            return CooldownStatus::Throttled { remaining: expires_at - now };
        }

        let expires_at = now + self.window;
        records.insert(user_id, expires_at);
        drop(records);

        self.schedule_eviction(user_id, expires_at);

        CooldownStatus::Allowed
    }

    /// Drops the record for `user_id`, if any.
    pub async fn clear(&self, user_id: u64) {
        self.records.lock().await.remove(&user_id);
    }

    /// Number of users currently holding a record.
    pub async fn active(&self) -> usize {
        self.records.lock().await.len()
    }

    fn schedule_eviction(&self, user_id: u64, expires_at: Instant) {
        let records = Arc::clone(&self.records);

        ScheduledTask::after(self.window, async move {
            let mut records = records.lock().await;

            // Only evict the record this timer was armed for.
            if records.get(&user_id) == Some(&expires_at) {
                records.remove(&user_id);
                debug!("Cooldown for user {} expired.", user_id);
            }
        });
    }
}

/// Renders a remaining wait with one decimal place, e.g. `8.0`.
pub fn format_remaining(remaining: Duration) -> String {
    format!("{:.1}", remaining.as_secs_f64())
}

// Tests.
