//! Reading mode, font size and theme chosen on the reading-mode screen.
//!
//! Each preference is stored as a bare string under its own key. Unknown
//! or missing values fall back to the defaults.

use crate::store::{FONT_SIZE_KEY, KeyValueStore, READING_MODE_KEY, READING_THEME_KEY};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ReadingMode {
    #[default]
    Default,
    Night,
    Sepia,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
    #[serde(rename = "xlarge")]
    ExtraLarge,
}

impl FontSize {
    /// Point size used when rendering text at this setting.
    pub fn points(self) -> u32 {
        match self {
            FontSize::Small => 14,
            FontSize::Medium => 16,
            FontSize::Large => 18,
            FontSize::ExtraLarge => 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ReadingTheme {
    #[default]
    Light,
    Dark,
    Sepia,
}

/// Stored label for a preference value, e.g. `"night"` or `"xlarge"`.
trait StoredLabel: Sized + Copy + 'static {
    const LABELS: &'static [(&'static str, Self)];

    fn label(self) -> &'static str
    where
        Self: PartialEq,
    {
        Self::LABELS
            .iter()
            .find(|(_, value)| *value == self)
            .map(|(label, _)| *label)
            .unwrap_or("")
    }

    fn from_label(raw: &str) -> Option<Self> {
        Self::LABELS
            .iter()
            .find(|(label, _)| *label == raw.trim())
            .map(|(_, value)| *value)
    }
}

impl StoredLabel for ReadingMode {
    const LABELS: &'static [(&'static str, Self)] = &[
        ("default", ReadingMode::Default),
        ("night", ReadingMode::Night),
        ("sepia", ReadingMode::Sepia),
    ];
}

impl StoredLabel for FontSize {
    const LABELS: &'static [(&'static str, Self)] = &[
        ("small", FontSize::Small),
        ("medium", FontSize::Medium),
        ("large", FontSize::Large),
        ("xlarge", FontSize::ExtraLarge),
    ];
}

impl StoredLabel for ReadingTheme {
    const LABELS: &'static [(&'static str, Self)] = &[
        ("light", ReadingTheme::Light),
        ("dark", ReadingTheme::Dark),
        ("sepia", ReadingTheme::Sepia),
    ];
}

macro_rules! label_from_str {
    ($ty:ty) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                <$ty as StoredLabel>::from_label(raw)
                    .ok_or_else(|| format!("unknown {} value: {raw}", stringify!($ty)))
            }
        }
    };
}

label_from_str!(ReadingMode);
label_from_str!(FontSize);
label_from_str!(ReadingTheme);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export)]
pub struct ReadingPreferences {
    pub mode: ReadingMode,
    pub font_size: FontSize,
    pub theme: ReadingTheme,
}

pub struct PreferencesRepository {
    store: Arc<dyn KeyValueStore>,
}

impl PreferencesRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> ReadingPreferences {
        ReadingPreferences {
            mode: self.read(READING_MODE_KEY).await,
            font_size: self.read(FONT_SIZE_KEY).await,
            theme: self.read(READING_THEME_KEY).await,
        }
    }

    pub async fn set_mode(&self, mode: ReadingMode) -> Result<()> {
        self.write(READING_MODE_KEY, mode).await
    }

    pub async fn set_font_size(&self, size: FontSize) -> Result<()> {
        self.write(FONT_SIZE_KEY, size).await
    }

    pub async fn set_theme(&self, theme: ReadingTheme) -> Result<()> {
        self.write(READING_THEME_KEY, theme).await
    }

    async fn read<T: StoredLabel + Default>(&self, key: &str) -> T {
        match self.store.get(key).await {
            Ok(Some(raw)) => T::from_label(&raw).unwrap_or_else(|| {
                warn!(key, value = %raw, "Ignoring unknown preference value");
                T::default()
            }),
            Ok(None) => T::default(),
            Err(err) => {
                warn!(key, "Error loading reading preference: {err:#}");
                T::default()
            }
        }
    }

    async fn write<T: StoredLabel + PartialEq>(&self, key: &str, value: T) -> Result<()> {
        let label = value.label();
        self.store
            .set(key, label)
            .await
            .with_context(|| format!("Failed to save preference {key}"))?;
        debug!(key, value = label, "Saved reading preference");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn defaults_when_nothing_stored() {
        let repo = PreferencesRepository::new(Arc::new(MemoryStore::new()));
        let prefs = repo.load().await;
        assert_eq!(prefs, ReadingPreferences::default());
        assert_eq!(prefs.font_size.points(), 16);
    }

    #[tokio::test]
    async fn values_are_stored_as_bare_strings() {
        let store = Arc::new(MemoryStore::new());
        let repo = PreferencesRepository::new(store.clone());
        repo.set_mode(ReadingMode::Night).await.unwrap();
        repo.set_font_size(FontSize::ExtraLarge).await.unwrap();
        repo.set_theme(ReadingTheme::Sepia).await.unwrap();

        assert_eq!(store.get(READING_MODE_KEY).await.unwrap().as_deref(), Some("night"));
        assert_eq!(store.get(FONT_SIZE_KEY).await.unwrap().as_deref(), Some("xlarge"));
        assert_eq!(store.get(READING_THEME_KEY).await.unwrap().as_deref(), Some("sepia"));

        let prefs = repo.load().await;
        assert_eq!(prefs.mode, ReadingMode::Night);
        assert_eq!(prefs.font_size, FontSize::ExtraLarge);
        assert_eq!(prefs.theme, ReadingTheme::Sepia);
    }

    #[tokio::test]
    async fn unknown_stored_value_falls_back() {
        let store = Arc::new(MemoryStore::new());
        store.set(READING_THEME_KEY, "neon").await.unwrap();
        let repo = PreferencesRepository::new(store);
        assert_eq!(repo.load().await.theme, ReadingTheme::Light);
    }

    #[test]
    fn every_label_maps_back_to_its_value() {
        for (label, mode) in ReadingMode::LABELS {
            assert_eq!(mode.label(), *label);
            assert_eq!(ReadingMode::from_label(label), Some(*mode));
        }
        for (label, size) in FontSize::LABELS {
            assert_eq!(size.label(), *label);
        }
        for (label, theme) in ReadingTheme::LABELS {
            assert_eq!(label.parse::<ReadingTheme>(), Ok(*theme));
        }
        assert_eq!(FontSize::ExtraLarge.label(), "xlarge");
    }

    #[test]
    fn labels_parse() {
        assert_eq!("sepia".parse::<ReadingMode>(), Ok(ReadingMode::Sepia));
        assert_eq!(" large ".parse::<FontSize>(), Ok(FontSize::Large));
        assert!("huge".parse::<FontSize>().is_err());
    }
}
