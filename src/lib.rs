//! Persistence and page tracking for a Quran reader.
//!
//! - [`store`]: the key-value store the repositories persist through.
//! - [`favorites`], [`bookmarks`], [`resume`], [`preferences`]: one
//!   repository per stored record.
//! - [`viewport`]: which page of the fixed-height page list is on screen.
//! - [`reader`]: the per-visit controller tying the viewport to storage.

pub mod bookmarks;
pub mod clock;
pub mod config;
pub mod favorites;
pub mod logging;
pub mod preferences;
pub mod reader;
pub mod resume;
pub mod store;
pub mod viewport;

pub use bookmarks::{BookmarkEntry, BookmarksRepository};
pub use clock::{Clock, SystemClock};
pub use config::{AppConfig, load_config};
pub use favorites::{FavoriteEntry, FavoriteKind, FavoritesRepository, NewFavorite, StorageOutcome};
pub use preferences::{PreferencesRepository, ReadingPreferences};
pub use reader::{ReaderCommand, ReaderController, ReaderRoute, ScrollHost};
pub use resume::{ResumePosition, ResumePositionTracker};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use viewport::{PageChange, PageViewportTracker, ViewableItem};
