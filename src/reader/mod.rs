//! Reader session: drives the page list, follows the viewport, and keeps
//! the resume position and the current page's bookmark star up to date.
//!
//! A [`ReaderController`] lives for one visit to the reader screen. Hosts
//! either call its methods directly or route [`ReaderCommand`]s through
//! [`ReaderController::apply_command`] and render the returned snapshot.
//! Teardown goes through [`ReaderController::unmount`] or by releasing the
//! [`SessionLifetime`] handed out by [`ReaderController::lifetime`]; jump
//! steps still waiting on a delay stop without touching session state.

mod bookmark;
mod host;
mod lifetime;
mod navigation;

pub use bookmark::BookmarkDraft;
pub use host::{JumpTiming, ScrollHost, ScrollToIndexError};
pub use lifetime::{SessionEnded, SessionLifetime};
pub use navigation::{PageInputError, ReaderRoute, parse_page_input};

use crate::bookmarks::{BookmarkEntry, BookmarksRepository};
use crate::config::AppConfig;
use crate::resume::ResumePositionTracker;
use crate::viewport::{PageChange, PageViewportTracker, TrackerState, ViewableItem};
use serde::Serialize;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use ts_rs::TS;

pub const NOTICE_BOOKMARK_SAVE_FAILED: &str = "Failed to save bookmark";
pub const NOTICE_BOOKMARK_REMOVE_FAILED: &str = "Failed to remove bookmark";
pub const NOTICE_NO_DRAFT: &str = "No bookmark in progress";

pub type PageListener = Box<dyn FnMut(PageChange) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Result of the bookmark star on the reader header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkToggle {
    /// The page was bookmarked; all of its bookmarks were removed.
    Removed { page: u32, removed: usize },
    /// The page was not bookmarked; a draft is waiting for confirmation.
    DraftOpened { page: u32 },
    Failed { message: String },
}

#[derive(Debug, Clone)]
pub enum ReaderCommand {
    GetSnapshot,
    JumpToPage { page: i64 },
    GoToPageInput { input: String },
    NextPage,
    PrevPage,
    ViewableItemsChanged { items: Vec<ViewableItem> },
    Scrolled { offset_y: f32 },
    ToggleBookmark { comment: Option<String> },
    SetBookmarkComment { comment: String },
    ConfirmBookmark,
    CancelBookmark,
    RemoveBookmark { id: i64 },
}

impl ReaderCommand {
    pub fn action(&self) -> &'static str {
        match self {
            Self::GetSnapshot => "reader_get_snapshot",
            Self::JumpToPage { .. } => "reader_jump_to_page",
            Self::GoToPageInput { .. } => "reader_go_to_page_input",
            Self::NextPage => "reader_next_page",
            Self::PrevPage => "reader_prev_page",
            Self::ViewableItemsChanged { .. } => "reader_viewable_items_changed",
            Self::Scrolled { .. } => "reader_scrolled",
            Self::ToggleBookmark { .. } => "reader_toggle_bookmark",
            Self::SetBookmarkComment { .. } => "reader_set_bookmark_comment",
            Self::ConfirmBookmark => "reader_confirm_bookmark",
            Self::CancelBookmark => "reader_cancel_bookmark",
            Self::RemoveBookmark { .. } => "reader_remove_bookmark",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ReaderSnapshot {
    pub current_page: u32,
    pub total_pages: u32,
    pub state: TrackerState,
    pub page_bookmarked: bool,
    pub draft: Option<BookmarkDraft>,
    /// Message for the user from the last failed operation.
    pub notice: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReaderEvent {
    pub action: &'static str,
    pub snapshot: ReaderSnapshot,
}

pub struct ReaderController {
    tracker: PageViewportTracker,
    bookmarks: Arc<BookmarksRepository>,
    resume: Arc<ResumePositionTracker>,
    timing: JumpTiming,
    lifetime: SessionLifetime,
    listeners: Vec<(ListenerId, PageListener)>,
    next_listener_id: u64,
    draft: Option<BookmarkDraft>,
    page_bookmarked: bool,
    notice: Option<String>,
}

impl ReaderController {
    pub fn new(
        config: &AppConfig,
        bookmarks: Arc<BookmarksRepository>,
        resume: Arc<ResumePositionTracker>,
    ) -> Self {
        Self {
            tracker: PageViewportTracker::new(config.total_pages(), config.page_height),
            bookmarks,
            resume,
            timing: JumpTiming {
                fallback: config.index_scroll_fallback(),
                retry: config.index_scroll_retry(),
            },
            lifetime: SessionLifetime::new(),
            listeners: Vec::new(),
            next_listener_id: 0,
            draft: None,
            page_bookmarked: false,
            notice: None,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.tracker.current_page()
    }

    pub fn total_pages(&self) -> u32 {
        self.tracker.total_pages()
    }

    pub fn state(&self) -> TrackerState {
        self.tracker.state()
    }

    pub fn is_current_page_bookmarked(&self) -> bool {
        self.page_bookmarked
    }

    pub fn draft(&self) -> Option<&BookmarkDraft> {
        self.draft.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Handle for ending the session from outside the controller.
    pub fn lifetime(&self) -> SessionLifetime {
        self.lifetime.clone()
    }

    pub fn snapshot(&self) -> ReaderSnapshot {
        ReaderSnapshot {
            current_page: self.current_page(),
            total_pages: self.total_pages(),
            state: self.state(),
            page_bookmarked: self.page_bookmarked,
            draft: self.draft.clone(),
            notice: self.notice.clone(),
        }
    }

    pub fn on_page_change(&mut self, listener: PageListener) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn remove_page_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Position the session for `route`: jump to its explicit page, or
    /// resume where the reader left off, or start at page 1.
    pub async fn open<H: ScrollHost>(&mut self, route: &ReaderRoute, host: &mut H) -> Option<u32> {
        if self.session_ended("open") {
            return None;
        }
        if let Some(target) = route.explicit_page() {
            info!(target, "Opening reader at requested page");
            return self.jump_to_page(target, host).await;
        }

        let start = match self.resume.load().await {
            Some(position) => {
                info!(page = position.page, "Resuming from saved page");
                i64::from(position.page)
            }
            None => 1,
        };
        self.tracker.mount_at(start);
        let page = self.tracker.current_page();
        host.scroll_to_offset(self.tracker.offset_for_page(page), false);
        self.refresh_bookmark_state().await;
        Some(page)
    }

    /// Scroll to `page` (clamped). Returns the page the session settled
    /// on, or `None` if the session ended before the jump finished.
    pub async fn jump_to_page<H: ScrollHost>(&mut self, page: i64, host: &mut H) -> Option<u32> {
        if self.session_ended("jump_start") {
            return None;
        }
        let request = self.tracker.begin_jump(page)?;
        host.scroll_to_offset(request.offset, false);

        sleep(self.timing.fallback).await;
        if self.session_ended("scroll_to_index") {
            return None;
        }
        if let Err(err) = host.scroll_to_index(request.index, false) {
            warn!(page = request.page, "Index scroll failed: {err}");
            if self.tracker.allow_index_retry() {
                sleep(self.timing.retry).await;
                if self.session_ended("scroll_to_index_retry") {
                    return None;
                }
                if let Err(err) = host.scroll_to_index(request.index, false) {
                    warn!(
                        page = request.page,
                        "Index scroll retry failed; keeping offset position: {err}"
                    );
                }
            }
        }

        if let Some(change) = self.tracker.complete_jump() {
            self.commit(change).await;
        } else {
            self.refresh_bookmark_state().await;
        }
        Some(self.tracker.current_page())
    }

    pub async fn next_page<H: ScrollHost>(&mut self, host: &mut H) -> Option<u32> {
        let current = self.current_page();
        if current >= self.total_pages() {
            debug!(current, "Already on the last page");
            return Some(current);
        }
        self.jump_to_page(i64::from(current) + 1, host).await
    }

    pub async fn previous_page<H: ScrollHost>(&mut self, host: &mut H) -> Option<u32> {
        let current = self.current_page();
        if current <= 1 {
            debug!("Already on the first page");
            return Some(current);
        }
        self.jump_to_page(i64::from(current) - 1, host).await
    }

    pub async fn on_viewable_items_changed(&mut self, items: &[ViewableItem]) -> Option<PageChange> {
        if self.session_ended("viewable_items") {
            return None;
        }
        let change = self.tracker.observe_viewable(items)?;
        self.commit(change).await;
        Some(change)
    }

    pub async fn on_scroll(&mut self, offset_y: f32) -> Option<PageChange> {
        if self.session_ended("scroll") {
            return None;
        }
        let change = self.tracker.observe_offset(offset_y)?;
        self.commit(change).await;
        Some(change)
    }

    /// Star on the reader header: unbookmark the current page, or open a
    /// comment draft for it.
    pub async fn toggle_bookmark_for_current_page(&mut self, comment: Option<String>) -> BookmarkToggle {
        let page = self.current_page();
        if self.bookmarks.is_page_bookmarked(page).await {
            match self.bookmarks.remove_page(page).await {
                Ok(removed) => {
                    self.page_bookmarked = false;
                    BookmarkToggle::Removed { page, removed }
                }
                Err(err) => {
                    warn!(page, "Error removing bookmark: {err:#}");
                    self.fail(NOTICE_BOOKMARK_REMOVE_FAILED)
                }
            }
        } else {
            self.draft = Some(BookmarkDraft::new(page, comment.as_deref().unwrap_or_default()));
            debug!(page, "Bookmark draft opened");
            BookmarkToggle::DraftOpened { page }
        }
    }

    pub fn set_bookmark_comment(&mut self, comment: &str) -> bool {
        match self.draft.as_mut() {
            Some(draft) => {
                draft.set_comment(comment);
                true
            }
            None => false,
        }
    }

    pub fn cancel_bookmark(&mut self) {
        if let Some(draft) = self.draft.take() {
            debug!(page = draft.page, "Bookmark draft cancelled");
        }
    }

    /// Save the open draft. On failure the draft stays open.
    pub async fn confirm_bookmark(&mut self) -> Result<BookmarkEntry, String> {
        let Some(draft) = self.draft.take() else {
            self.notice = Some(NOTICE_NO_DRAFT.to_string());
            return Err(NOTICE_NO_DRAFT.to_string());
        };
        match self.bookmarks.add(draft.page, draft.comment.clone()).await {
            Ok(entry) => {
                if entry.page == self.current_page() {
                    self.page_bookmarked = true;
                }
                Ok(entry)
            }
            Err(err) => {
                warn!(page = draft.page, "Error saving bookmark: {err:#}");
                self.draft = Some(draft);
                self.notice = Some(NOTICE_BOOKMARK_SAVE_FAILED.to_string());
                Err(NOTICE_BOOKMARK_SAVE_FAILED.to_string())
            }
        }
    }

    pub async fn remove_bookmark(&mut self, id: i64) -> Result<(), String> {
        if let Err(err) = self.bookmarks.remove(id).await {
            warn!(id, "Error removing bookmark: {err:#}");
            self.notice = Some(NOTICE_BOOKMARK_REMOVE_FAILED.to_string());
            return Err(NOTICE_BOOKMARK_REMOVE_FAILED.to_string());
        }
        self.refresh_bookmark_state().await;
        Ok(())
    }

    pub async fn apply_command<H: ScrollHost>(&mut self, command: ReaderCommand, host: &mut H) -> ReaderEvent {
        let action = command.action();
        match command {
            ReaderCommand::GetSnapshot => {}
            ReaderCommand::JumpToPage { page } => {
                self.jump_to_page(page, host).await;
            }
            ReaderCommand::GoToPageInput { input } => match parse_page_input(&input, self.total_pages()) {
                Ok(page) => {
                    self.jump_to_page(i64::from(page), host).await;
                }
                Err(err) => {
                    debug!(%input, "Rejected page input: {err}");
                    self.notice = Some(err.to_string());
                }
            },
            ReaderCommand::NextPage => {
                self.next_page(host).await;
            }
            ReaderCommand::PrevPage => {
                self.previous_page(host).await;
            }
            ReaderCommand::ViewableItemsChanged { items } => {
                self.on_viewable_items_changed(&items).await;
            }
            ReaderCommand::Scrolled { offset_y } => {
                self.on_scroll(offset_y).await;
            }
            ReaderCommand::ToggleBookmark { comment } => {
                self.toggle_bookmark_for_current_page(comment).await;
            }
            ReaderCommand::SetBookmarkComment { comment } => {
                self.set_bookmark_comment(&comment);
            }
            ReaderCommand::ConfirmBookmark => {
                let _ = self.confirm_bookmark().await;
            }
            ReaderCommand::CancelBookmark => self.cancel_bookmark(),
            ReaderCommand::RemoveBookmark { id } => {
                let _ = self.remove_bookmark(id).await;
            }
        }
        ReaderEvent {
            action,
            snapshot: self.snapshot(),
        }
    }

    /// End the session. Terminal.
    pub fn unmount(&mut self) {
        if !self.lifetime.release() {
            debug!("Session lifetime was already released");
        }
        self.shut_down();
    }

    fn session_ended(&mut self, stage: &'static str) -> bool {
        match self.lifetime.ensure_active(stage) {
            Ok(()) => false,
            Err(err) => {
                debug!(stage = err.stage, "{err}");
                self.shut_down();
                true
            }
        }
    }

    fn shut_down(&mut self) {
        if self.tracker.state() == TrackerState::Unmounted {
            return;
        }
        self.tracker.unmount();
        self.listeners.clear();
        self.draft = None;
        info!(page = self.tracker.current_page(), "Reader session ended");
    }

    async fn commit(&mut self, change: PageChange) {
        if let Err(err) = self.resume.save(change.to).await {
            warn!(page = change.to, "Error saving resume position: {err:#}");
        }
        self.refresh_bookmark_state().await;
        for (_, listener) in self.listeners.iter_mut() {
            listener(change);
        }
    }

    async fn refresh_bookmark_state(&mut self) {
        self.page_bookmarked = self.bookmarks.is_page_bookmarked(self.current_page()).await;
    }

    fn fail(&mut self, message: &str) -> BookmarkToggle {
        self.notice = Some(message.to_string());
        BookmarkToggle::Failed {
            message: message.to_string(),
        }
    }
}
