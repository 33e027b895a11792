//! Where a reader session starts, and parsing of typed page numbers.

use crate::bookmarks::BookmarkEntry;
use crate::favorites::{FavoriteEntry, FavoriteKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Parameters the reader screen is opened with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReaderRoute {
    #[serde(default)]
    pub page_number: Option<i64>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub chapter_name: Option<String>,
    /// Display labels, passed through as given (often Arabic numerals).
    #[serde(default)]
    pub verse_number: Option<String>,
    #[serde(default)]
    pub section_number: Option<String>,
    #[serde(default)]
    pub juz_number: Option<String>,
}

impl ReaderRoute {
    pub fn to_page(page: i64) -> Self {
        Self {
            page_number: Some(page),
            ..Self::default()
        }
    }

    pub fn from_favorite(entry: &FavoriteEntry) -> Self {
        let mut route = Self::to_page(i64::from(entry.page_number));
        match entry.kind {
            FavoriteKind::Surah => route.chapter_name = Some(entry.english.clone()),
            FavoriteKind::Para => {
                route.section_number = Some(entry.item_id.clone());
                route.juz_number = Some(entry.item_id.clone());
            }
        }
        route
    }

    pub fn from_bookmark(entry: &BookmarkEntry) -> Self {
        Self {
            page: Some(i64::from(entry.page)),
            ..Self::default()
        }
    }

    /// Explicitly requested page: `pageNumber`, then `page`. Zero counts
    /// as absent.
    pub fn explicit_page(&self) -> Option<i64> {
        self.page_number
            .filter(|page| *page != 0)
            .or(self.page.filter(|page| *page != 0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageInputError {
    #[error("Please enter a page number")]
    Empty,
    #[error("'{0}' is not a page number")]
    NotANumber(String),
    #[error("Page {page} is out of range (1-{total})")]
    OutOfRange { page: i64, total: u32 },
}

/// Parse the go-to-page field.
pub fn parse_page_input(input: &str, total_pages: u32) -> Result<u32, PageInputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PageInputError::Empty);
    }
    let page: i64 = trimmed
        .parse()
        .map_err(|_| PageInputError::NotANumber(trimmed.to_string()))?;
    if page < 1 || page > i64::from(total_pages) {
        return Err(PageInputError::OutOfRange {
            page,
            total: total_pages,
        });
    }
    Ok(page as u32)
}
