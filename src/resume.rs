//! "Resume where I left off" position.
//!
//! A single record under [`RESUME_KEY`]; each save replaces the last one.

use crate::clock::Clock;
use crate::store::{KeyValueStore, RESUME_KEY, read_json, write_json};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResumePosition {
    pub page: u32,
    pub timestamp: String,
}

pub struct ResumePositionTracker {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl ResumePositionTracker {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn save(&self, page: u32) -> Result<()> {
        let position = ResumePosition {
            page,
            timestamp: self.clock.now_iso(),
        };
        write_json(self.store.as_ref(), RESUME_KEY, &position)
            .await
            .context("Failed to save resume position")?;
        debug!(page, "Saved resume position");
        Ok(())
    }

    pub async fn load(&self) -> Option<ResumePosition> {
        match read_json(self.store.as_ref(), RESUME_KEY).await {
            Ok(position) => position,
            Err(err) => {
                warn!("Error loading resume position: {err:#}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::testing::ManualClock;
    use crate::store::MemoryStore;

    fn tracker() -> (Arc<MemoryStore>, Arc<ManualClock>, ResumePositionTracker) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::at_millis(1_700_000_000_000));
        let tracker = ResumePositionTracker::new(store.clone(), clock.clone());
        (store, clock, tracker)
    }

    #[tokio::test]
    async fn save_overwrites_previous_position() {
        let (_store, clock, tracker) = tracker();
        tracker.save(42).await.unwrap();
        assert_eq!(tracker.load().await.map(|p| p.page), Some(42));

        clock.advance_millis(60_000);
        tracker.save(10).await.unwrap();
        let loaded = tracker.load().await.unwrap();
        assert_eq!(loaded.page, 10);
        assert_eq!(loaded.timestamp, "2023-11-14T22:14:20.000Z");
    }

    #[tokio::test]
    async fn absent_or_garbled_record_loads_as_none() {
        let (store, _clock, tracker) = tracker();
        assert_eq!(tracker.load().await, None);

        store.set(RESUME_KEY, r#"{"page":"twelve"}"#).await.unwrap();
        assert_eq!(tracker.load().await, None);
    }
}
