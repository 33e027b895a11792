//! Page bookmarks with optional comments.
//!
//! Bookmarks are kept as one JSON array under [`BOOKMARKS_KEY`] in
//! creation order. Several bookmarks may point at the same page; a page
//! counts as bookmarked while at least one of them remains.

use crate::clock::Clock;
use crate::store::{BOOKMARKS_KEY, KeyValueStore, read_json, write_json};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use ts_rs::TS;

/// Longest comment the bookmark dialog accepts, in characters.
pub const MAX_COMMENT_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BookmarkEntry {
    /// Creation time in epoch milliseconds.
    pub id: i64,
    pub page: u32,
    #[serde(default)]
    pub comment: String,
    pub timestamp: String,
}

pub struct BookmarksRepository {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl BookmarksRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Append a bookmark. No duplicate check is made against `page`.
    pub async fn add(&self, page: u32, comment: impl Into<String>) -> Result<BookmarkEntry> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;

        let mut id = self.clock.now_millis();
        // Ids are creation millis; two adds inside one millisecond would
        // otherwise collide.
        if let Some(max) = entries.iter().map(|entry| entry.id).max() {
            if id <= max {
                id = max.saturating_add(1);
            }
        }

        let entry = BookmarkEntry {
            id,
            page,
            comment: comment.into(),
            timestamp: self.clock.now_iso(),
        };
        entries.push(entry.clone());
        write_json(self.store.as_ref(), BOOKMARKS_KEY, &entries)
            .await
            .context("Failed to save bookmark")?;
        info!(id, page, "Bookmark added");
        Ok(entry)
    }

    /// Bookmarks in creation order; empty when nothing is stored or the
    /// stored record cannot be read.
    pub async fn list(&self) -> Vec<BookmarkEntry> {
        match self.load().await {
            Ok(entries) => entries,
            Err(err) => {
                warn!("Error loading bookmarks: {err:#}");
                Vec::new()
            }
        }
    }

    pub async fn remove(&self, id: i64) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let removed = self.retain(|entry| entry.id != id).await?;
        info!(id, removed, "Bookmark removed");
        Ok(())
    }

    /// Remove every bookmark on `page`, returning how many went away.
    pub async fn remove_page(&self, page: u32) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let removed = self.retain(|entry| entry.page != page).await?;
        info!(page, removed, "Bookmarks removed for page");
        Ok(removed)
    }

    pub async fn clear_all(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.store
            .remove(BOOKMARKS_KEY)
            .await
            .context("Failed to clear bookmarks")?;
        info!("Cleared all bookmarks");
        Ok(())
    }

    pub async fn is_page_bookmarked(&self, page: u32) -> bool {
        self.list().await.iter().any(|entry| entry.page == page)
    }

    async fn load(&self) -> Result<Vec<BookmarkEntry>> {
        Ok(read_json(self.store.as_ref(), BOOKMARKS_KEY)
            .await
            .context("Failed to load bookmarks")?
            .unwrap_or_default())
    }

    async fn retain<F>(&self, keep: F) -> Result<usize>
    where
        F: Fn(&BookmarkEntry) -> bool,
    {
        let mut entries = self.load().await?;
        let before = entries.len();
        entries.retain(|entry| keep(entry));
        write_json(self.store.as_ref(), BOOKMARKS_KEY, &entries)
            .await
            .context("Failed to delete bookmark")?;
        Ok(before - entries.len())
    }
}
