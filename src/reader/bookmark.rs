use crate::bookmarks::MAX_COMMENT_CHARS;
use serde::Serialize;
use ts_rs::TS;

/// Bookmark being composed in the comment dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct BookmarkDraft {
    pub page: u32,
    pub comment: String,
}

impl BookmarkDraft {
    pub fn new(page: u32, comment: &str) -> Self {
        Self {
            page,
            comment: clip_comment(comment),
        }
    }

    pub fn set_comment(&mut self, comment: &str) {
        self.comment = clip_comment(comment);
    }
}

fn clip_comment(comment: &str) -> String {
    comment.chars().take(MAX_COMMENT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_are_clipped_by_character() {
        let long = "ب".repeat(MAX_COMMENT_CHARS + 20);
        let mut draft = BookmarkDraft::new(3, &long);
        assert_eq!(draft.comment.chars().count(), MAX_COMMENT_CHARS);

        draft.set_comment("short note");
        assert_eq!(draft.comment, "short note");
    }
}
