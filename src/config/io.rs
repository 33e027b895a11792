use super::models::AppConfig;
use super::tables::ConfigTables;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load the config at `path`, falling back to defaults when the file is
/// missing or unreadable.
pub fn load_config(path: &Path) -> AppConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return AppConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            debug!(
                content_set = %config.content_set,
                level = %config.log_level,
                "Parsed configuration from disk"
            );
            config
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err:#}");
            AppConfig::default()
        }
    }
}

pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let tables: ConfigTables = toml::from_str(contents).context("Failed to parse config TOML")?;
    let mut config = AppConfig::from(tables);
    if !config.page_height.is_finite() || config.page_height <= 0.0 {
        warn!(
            page_height = config.page_height,
            "Ignoring non-positive page height"
        );
        config.page_height = AppConfig::default().page_height;
    }
    Ok(config)
}

pub fn serialize_config(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(&ConfigTables::from(config)).context("Failed to serialize config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ContentSet, LogLevel};

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.total_pages(), 134);
        assert_eq!(config.index_scroll_fallback_ms, 500);
        assert_eq!(config.index_scroll_retry_ms, 1000);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn tables_map_onto_flat_config() {
        let config = parse_config(
            r#"
            [reader]
            content_set = "full"
            page_height = 1200.0

            [timing]
            index_scroll_retry_ms = 250

            [storage]
            storage_dir = "/tmp/quran"

            [logging]
            log_level = "trace"
            "#,
        )
        .unwrap();
        assert_eq!(config.content_set, ContentSet::Full);
        assert_eq!(config.total_pages(), 604);
        assert_eq!(config.page_height, 1200.0);
        assert_eq!(config.index_scroll_fallback_ms, 500);
        assert_eq!(config.index_scroll_retry_ms, 250);
        assert_eq!(config.storage_dir, "/tmp/quran");
        assert_eq!(config.log_level.as_filter_str(), "trace");
    }

    #[test]
    fn bad_page_height_is_replaced() {
        let config = parse_config("[reader]\npage_height = -4.0\n").unwrap();
        assert_eq!(config.page_height, 800.0);
    }

    #[test]
    fn unknown_enum_value_is_an_error() {
        assert!(parse_config("[reader]\ncontent_set = \"tafsir\"\n").is_err());
    }

    #[test]
    fn serialized_config_parses_back() {
        let mut config = AppConfig::default();
        config.content_set = ContentSet::Full;
        config.log_level = LogLevel::Warn;
        let text = serialize_config(&config).unwrap();
        assert!(text.contains("[timing]"));
        assert_eq!(parse_config(&text).unwrap(), config);
    }

    #[test]
    fn missing_or_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            load_config(&dir.path().join("absent.toml")),
            AppConfig::default()
        );

        let path = dir.path().join("config.toml");
        fs::write(&path, "[reader\n").unwrap();
        assert_eq!(load_config(&path), AppConfig::default());

        fs::write(&path, "[storage]\nstorage_dir = \"data\"\n").unwrap();
        assert_eq!(load_config(&path).storage_path(), Path::new("data"));
    }
}
