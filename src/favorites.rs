//! Favorite chapters and sections.
//!
//! All favorites live in one JSON array under [`FAVORITES_KEY`]; every
//! mutation rewrites the whole array. At most one entry exists per
//! `(kind, item_id)` pair.
//!
//! Nothing here returns an error: store failures are logged and turned
//! into a [`StorageOutcome`] with `success = false`, and reads that fail
//! come back empty.

use crate::clock::Clock;
use crate::store::{FAVORITES_KEY, KeyValueStore, read_json, write_json};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum FavoriteKind {
    Surah,
    Para,
}

impl fmt::Display for FavoriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FavoriteKind::Surah => "surah",
            FavoriteKind::Para => "para",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FavoriteEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FavoriteKind,
    pub item_id: String,
    pub arabic: String,
    pub english: String,
    pub page_number: u32,
    pub date_added: String,
}

/// Input for [`FavoritesRepository::add`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewFavorite {
    #[serde(rename = "type")]
    pub kind: FavoriteKind,
    pub item_id: String,
    pub arabic: String,
    pub english: String,
    pub page_number: u32,
}

/// Result reported to the UI for favorites mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct StorageOutcome {
    pub success: bool,
    pub message: String,
}

impl StorageOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

pub const MSG_ADDED: &str = "Added to favorites";
pub const MSG_ALREADY_EXISTS: &str = "Already in favorites";
pub const MSG_REMOVED: &str = "Removed from favorites";
pub const MSG_CLEARED: &str = "All favorites cleared";
pub const MSG_SAVE_FAILED: &str = "Failed to save favorite";
pub const MSG_REMOVE_FAILED: &str = "Failed to remove favorite";
pub const MSG_CLEAR_FAILED: &str = "Failed to clear favorites";

pub struct FavoritesRepository {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl FavoritesRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Stored favorites in insertion order.
    pub async fn list(&self) -> Vec<FavoriteEntry> {
        match self.load().await {
            Ok(entries) => entries,
            Err(err) => {
                warn!("Error getting favorites: {err:#}");
                Vec::new()
            }
        }
    }

    pub async fn add(&self, favorite: NewFavorite) -> StorageOutcome {
        let _guard = self.write_lock.lock().await;
        match self.add_locked(favorite).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("Error saving favorite: {err:#}");
                StorageOutcome::failed(MSG_SAVE_FAILED)
            }
        }
    }

    pub async fn remove(&self, id: &str) -> StorageOutcome {
        let _guard = self.write_lock.lock().await;
        match self.remove_locked(|entry| entry.id == id).await {
            Ok(removed) => {
                debug!(id, removed, "Favorite removal applied");
                StorageOutcome::ok(MSG_REMOVED)
            }
            Err(err) => {
                warn!(id, "Error removing favorite: {err:#}");
                StorageOutcome::failed(MSG_REMOVE_FAILED)
            }
        }
    }

    /// Remove the entry for `(kind, item_id)` if there is one, otherwise
    /// add it.
    pub async fn toggle(&self, favorite: NewFavorite) -> StorageOutcome {
        let _guard = self.write_lock.lock().await;
        let kind = favorite.kind;
        let item_id = favorite.item_id.clone();
        let result = match self.load().await {
            Ok(entries) if entries.iter().any(|e| e.matches(kind, &item_id)) => self
                .remove_locked(|entry| entry.matches(kind, &item_id))
                .await
                .map(|_| StorageOutcome::ok(MSG_REMOVED)),
            Ok(_) => self.add_locked(favorite).await,
            Err(err) => Err(err),
        };
        result.unwrap_or_else(|err| {
            warn!(%kind, item_id = %item_id, "Error toggling favorite: {err:#}");
            StorageOutcome::failed(MSG_SAVE_FAILED)
        })
    }

    pub async fn is_favorite(&self, kind: FavoriteKind, item_id: &str) -> bool {
        self.list()
            .await
            .iter()
            .any(|entry| entry.matches(kind, item_id))
    }

    pub async fn clear_all(&self) -> StorageOutcome {
        let _guard = self.write_lock.lock().await;
        match self.store.remove(FAVORITES_KEY).await {
            Ok(()) => {
                info!("Cleared all favorites");
                StorageOutcome::ok(MSG_CLEARED)
            }
            Err(err) => {
                warn!("Error clearing favorites: {err:#}");
                StorageOutcome::failed(MSG_CLEAR_FAILED)
            }
        }
    }

    async fn load(&self) -> Result<Vec<FavoriteEntry>> {
        Ok(read_json(self.store.as_ref(), FAVORITES_KEY)
            .await?
            .unwrap_or_default())
    }

    async fn add_locked(&self, favorite: NewFavorite) -> Result<StorageOutcome> {
        let mut entries = self.load().await?;
        if entries
            .iter()
            .any(|entry| entry.matches(favorite.kind, &favorite.item_id))
        {
            debug!(kind = %favorite.kind, item_id = %favorite.item_id, "Favorite already present");
            return Ok(StorageOutcome::failed(MSG_ALREADY_EXISTS));
        }

        let entry = FavoriteEntry {
            id: format!(
                "{}_{}_{}",
                favorite.kind,
                favorite.item_id,
                self.clock.now_millis()
            ),
            kind: favorite.kind,
            item_id: favorite.item_id,
            arabic: favorite.arabic,
            english: favorite.english,
            page_number: favorite.page_number,
            date_added: self.clock.now_iso(),
        };
        info!(id = %entry.id, page = entry.page_number, "Adding favorite");
        entries.push(entry);
        write_json(self.store.as_ref(), FAVORITES_KEY, &entries).await?;
        Ok(StorageOutcome::ok(MSG_ADDED))
    }

    async fn remove_locked<F>(&self, predicate: F) -> Result<usize>
    where
        F: Fn(&FavoriteEntry) -> bool,
    {
        let mut entries = self.load().await?;
        let before = entries.len();
        entries.retain(|entry| !predicate(entry));
        write_json(self.store.as_ref(), FAVORITES_KEY, &entries).await?;
        Ok(before - entries.len())
    }
}

impl FavoriteEntry {
    fn matches(&self, kind: FavoriteKind, item_id: &str) -> bool {
        self.kind == kind && self.item_id == item_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::testing::ManualClock;
    use crate::store::MemoryStore;
    use crate::store::testing::FlakyStore;
    use std::collections::HashSet;

    fn surah(item_id: &str, page: u32) -> NewFavorite {
        NewFavorite {
            kind: FavoriteKind::Surah,
            item_id: item_id.to_string(),
            arabic: "الفاتحة".to_string(),
            english: "Al-Fatihah".to_string(),
            page_number: page,
        }
    }

    fn para(item_id: &str, page: u32) -> NewFavorite {
        NewFavorite {
            kind: FavoriteKind::Para,
            item_id: item_id.to_string(),
            arabic: "الم".to_string(),
            english: "Alif Lam Meem".to_string(),
            page_number: page,
        }
    }

    fn repo_with(store: Arc<dyn KeyValueStore>) -> FavoritesRepository {
        let clock = Arc::new(ManualClock::at_millis(1_700_000_000_000));
        FavoritesRepository::new(store, clock)
    }

    #[tokio::test]
    async fn duplicate_add_is_rejected_without_writing() {
        let store = Arc::new(FlakyStore::new());
        let repo = repo_with(store.clone());

        let first = repo.add(surah("01", 1)).await;
        assert!(first.success);
        assert_eq!(first.message, MSG_ADDED);
        assert_eq!(repo.list().await.len(), 1);
        let writes_after_first = store.write_count();

        let second = repo.add(surah("01", 1)).await;
        assert!(!second.success);
        assert_eq!(second.message, MSG_ALREADY_EXISTS);
        assert_eq!(repo.list().await.len(), 1);
        assert_eq!(store.write_count(), writes_after_first);
    }

    #[tokio::test]
    async fn same_item_id_under_different_kinds_are_distinct() {
        let repo = repo_with(Arc::new(MemoryStore::new()));
        assert!(repo.add(surah("02", 2)).await.success);
        assert!(repo.add(para("02", 22)).await.success);

        assert!(repo.is_favorite(FavoriteKind::Surah, "02").await);
        assert!(repo.is_favorite(FavoriteKind::Para, "02").await);
        assert!(!repo.is_favorite(FavoriteKind::Para, "03").await);
    }

    #[tokio::test]
    async fn entries_keep_insertion_order_and_generated_fields() {
        let repo = repo_with(Arc::new(MemoryStore::new()));
        repo.add(surah("18", 58)).await;
        repo.add(surah("01", 1)).await;

        let entries = repo.list().await;
        let ids: Vec<_> = entries.iter().map(|e| e.item_id.as_str()).collect();
        assert_eq!(ids, vec!["18", "01"]);
        assert_eq!(entries[0].id, "surah_18_1700000000000");
        assert_eq!(entries[0].date_added, "2023-11-14T22:13:20.000Z");
        assert_eq!(entries[0].page_number, 58);
    }

    #[tokio::test]
    async fn stored_shape_uses_camel_case_and_type_field() {
        let store = Arc::new(MemoryStore::new());
        let repo = repo_with(store.clone());
        repo.add(para("30", 130)).await;

        let raw = store.get(FAVORITES_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &value[0];
        assert_eq!(first["type"], "para");
        assert_eq!(first["itemId"], "30");
        assert_eq!(first["pageNumber"], 130);
        assert!(first["dateAdded"].is_string());
    }

    #[tokio::test]
    async fn remove_by_id_and_missing_id_both_succeed() {
        let repo = repo_with(Arc::new(MemoryStore::new()));
        repo.add(surah("01", 1)).await;
        repo.add(surah("02", 2)).await;
        let target = repo.list().await[0].id.clone();

        assert!(repo.remove(&target).await.success);
        assert!(!repo.is_favorite(FavoriteKind::Surah, "01").await);
        assert!(repo.is_favorite(FavoriteKind::Surah, "02").await);

        let missing = repo.remove("surah_99_0").await;
        assert!(missing.success);
        assert_eq!(repo.list().await.len(), 1);
    }

    #[tokio::test]
    async fn invariant_holds_across_mixed_sequences() {
        let repo = repo_with(Arc::new(MemoryStore::new()));
        let ops = ["01", "02", "01", "03", "02", "01"];
        for (step, item) in ops.iter().enumerate() {
            if step % 3 == 2 {
                let id = repo
                    .list()
                    .await
                    .into_iter()
                    .find(|e| e.item_id == *item)
                    .map(|e| e.id);
                if let Some(id) = id {
                    repo.remove(&id).await;
                }
            } else {
                repo.add(surah(item, 1)).await;
            }

            let entries = repo.list().await;
            let unique: HashSet<_> = entries.iter().map(|e| (e.kind, e.item_id.clone())).collect();
            assert_eq!(unique.len(), entries.len(), "duplicate after step {step}");
        }
    }

    #[tokio::test]
    async fn toggle_flips_membership() {
        let repo = repo_with(Arc::new(MemoryStore::new()));
        assert!(repo.toggle(surah("07", 28)).await.success);
        assert!(repo.is_favorite(FavoriteKind::Surah, "07").await);

        let outcome = repo.toggle(surah("07", 28)).await;
        assert_eq!(outcome.message, MSG_REMOVED);
        assert!(!repo.is_favorite(FavoriteKind::Surah, "07").await);
    }

    #[tokio::test]
    async fn clear_all_removes_the_key() {
        let store = Arc::new(MemoryStore::new());
        let repo = repo_with(store.clone());
        repo.add(surah("01", 1)).await;

        assert!(repo.clear_all().await.success);
        assert!(repo.list().await.is_empty());
        assert!(!store.contains_key(FAVORITES_KEY));
    }

    #[tokio::test]
    async fn store_failures_become_outcomes() {
        let store = Arc::new(FlakyStore::new());
        let repo = repo_with(store.clone());
        repo.add(surah("01", 1)).await;

        store.fail_writes(true);
        let add = repo.add(surah("02", 2)).await;
        assert_eq!(add, StorageOutcome::failed(MSG_SAVE_FAILED));
        assert_eq!(
            repo.clear_all().await,
            StorageOutcome::failed(MSG_CLEAR_FAILED)
        );

        store.fail_reads(true);
        assert!(repo.list().await.is_empty());
        assert!(!repo.is_favorite(FavoriteKind::Surah, "01").await);
        assert_eq!(
            repo.remove("anything").await,
            StorageOutcome::failed(MSG_REMOVE_FAILED)
        );
    }

    #[tokio::test]
    async fn malformed_record_reads_as_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(FAVORITES_KEY, "{not json").await.unwrap();
        let repo = repo_with(store);

        assert!(repo.list().await.is_empty());
        assert!(repo.add(surah("01", 1)).await.success);
        assert_eq!(repo.list().await.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_adds_do_not_lose_updates() {
        let repo = Arc::new(repo_with(Arc::new(MemoryStore::new())));
        let handles: Vec<_> = (1..=10)
            .map(|n| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.add(surah(&format!("{n:02}"), n)).await })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().success);
        }

        assert_eq!(repo.list().await.len(), 10);
    }
}
