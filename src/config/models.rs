use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Flattened application configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "crate::config::defaults::default_content_set")]
    pub content_set: ContentSet,
    #[serde(default = "crate::config::defaults::default_page_height")]
    pub page_height: f32,
    #[serde(default = "crate::config::defaults::default_index_scroll_fallback_ms")]
    pub index_scroll_fallback_ms: u64,
    #[serde(default = "crate::config::defaults::default_index_scroll_retry_ms")]
    pub index_scroll_retry_ms: u64,
    #[serde(default = "crate::config::defaults::default_storage_dir")]
    pub storage_dir: String,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            content_set: crate::config::defaults::default_content_set(),
            page_height: crate::config::defaults::default_page_height(),
            index_scroll_fallback_ms: crate::config::defaults::default_index_scroll_fallback_ms(),
            index_scroll_retry_ms: crate::config::defaults::default_index_scroll_retry_ms(),
            storage_dir: crate::config::defaults::default_storage_dir(),
            log_level: crate::config::defaults::default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn total_pages(&self) -> u32 {
        self.content_set.total_pages()
    }

    pub fn index_scroll_fallback(&self) -> Duration {
        Duration::from_millis(self.index_scroll_fallback_ms)
    }

    pub fn index_scroll_retry(&self) -> Duration {
        Duration::from_millis(self.index_scroll_retry_ms)
    }

    pub fn storage_path(&self) -> PathBuf {
        PathBuf::from(&self.storage_dir)
    }
}

/// Which page images the reader pages through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSet {
    /// The bundled 134-page set.
    Primary,
    /// The complete 604-page mushaf.
    Full,
}

impl ContentSet {
    pub fn total_pages(self) -> u32 {
        match self {
            ContentSet::Primary => 134,
            ContentSet::Full => 604,
        }
    }
}

impl std::fmt::Display for ContentSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ContentSet::Primary => "primary",
            ContentSet::Full => "full",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
