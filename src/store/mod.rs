//! Local key-value persistence.
//!
//! Everything the reader persists goes through [`KeyValueStore`]: a flat
//! string-keyed store holding string values. Repositories own one key
//! each and encode their records as JSON before handing them over, so an
//! adapter never has to understand the payloads it holds.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Key holding the favorites array.
pub const FAVORITES_KEY: &str = "quran_favorites";
/// Key holding the bookmarks array.
pub const BOOKMARKS_KEY: &str = "quran_bookmarks";
/// Key holding the single resume-position record.
pub const RESUME_KEY: &str = "quran_resume_data";
/// Reading preference keys; values are bare strings, not JSON.
pub const READING_MODE_KEY: &str = "reading_mode";
pub const FONT_SIZE_KEY: &str = "font_size";
pub const READING_THEME_KEY: &str = "reading_theme";

/// Async string-keyed store shared by every repository.
///
/// `get` returns `Ok(None)` for a key that was never written or was
/// removed. Removing an absent key is not an error.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Read and decode the JSON record under `key`.
///
/// A malformed record reads as `None`; only store failures are errors.
pub(crate) async fn read_json<S, T>(store: &S, key: &str) -> Result<Option<T>>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!(key, "Discarding unparsable record: {err}");
            Ok(None)
        }
    }
}

pub(crate) async fn write_json<S, T>(store: &S, key: &str, value: &T) -> Result<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value).with_context(|| format!("encode {key}"))?;
    store.set(key, &raw).await
}
