use super::models::{ContentSet, LogLevel};

pub(crate) fn default_content_set() -> ContentSet {
    ContentSet::Primary
}

pub(crate) fn default_page_height() -> f32 {
    800.0
}

pub(crate) fn default_index_scroll_fallback_ms() -> u64 {
    500
}

pub(crate) fn default_index_scroll_retry_ms() -> u64 {
    1000
}

pub(crate) fn default_storage_dir() -> String {
    ".quran-store".to_string()
}

pub(crate) fn default_log_level() -> LogLevel {
    LogLevel::Info
}
