use super::defaults;
use super::models::{AppConfig, ContentSet, LogLevel};
use serde::Deserialize;

/// On-disk layout of the config file.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    reader: ReaderConfig,
    #[serde(default)]
    timing: TimingConfig,
    #[serde(default)]
    storage: StorageConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            content_set: tables.reader.content_set,
            page_height: tables.reader.page_height,
            index_scroll_fallback_ms: tables.timing.index_scroll_fallback_ms,
            index_scroll_retry_ms: tables.timing.index_scroll_retry_ms,
            storage_dir: tables.storage.storage_dir,
            log_level: tables.logging.log_level,
        }
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            reader: ReaderConfig {
                content_set: config.content_set,
                page_height: config.page_height,
            },
            timing: TimingConfig {
                index_scroll_fallback_ms: config.index_scroll_fallback_ms,
                index_scroll_retry_ms: config.index_scroll_retry_ms,
            },
            storage: StorageConfig {
                storage_dir: config.storage_dir.clone(),
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ReaderConfig {
    #[serde(default = "defaults::default_content_set")]
    content_set: ContentSet,
    #[serde(default = "defaults::default_page_height")]
    page_height: f32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            content_set: defaults::default_content_set(),
            page_height: defaults::default_page_height(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct TimingConfig {
    #[serde(default = "defaults::default_index_scroll_fallback_ms")]
    index_scroll_fallback_ms: u64,
    #[serde(default = "defaults::default_index_scroll_retry_ms")]
    index_scroll_retry_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            index_scroll_fallback_ms: defaults::default_index_scroll_fallback_ms(),
            index_scroll_retry_ms: defaults::default_index_scroll_retry_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct StorageConfig {
    #[serde(default = "defaults::default_storage_dir")]
    storage_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            storage_dir: defaults::default_storage_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}
