//! Which page of the reader list is on screen.
//!
//! The reader renders its content as a virtualized list of fixed-height
//! pages, so page `n` (1-based) starts at offset `(n - 1) * page_height`.
//! The host reports two kinds of events while the user scrolls:
//! viewability samples (which rows are visible, and how much of each) and
//! raw scroll offsets. Both feed [`PageViewportTracker::propose_page`], the
//! one place that decides whether the current page changed. A change is
//! reported once no matter how many events describe it.
//!
//! Programmatic jumps are tracked here as well. The first jump of a
//! session holds the tracker in [`TrackerState::Initializing`]; samples
//! arriving before it completes describe the list's initial layout, not
//! the reader's position, and are ignored.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, trace};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TrackerState {
    Initializing,
    Tracking,
    Unmounted,
}

/// One row of a viewability sample.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ViewableItem {
    /// Row index as reported by the list; may be out of range.
    pub index: i64,
    pub visible_percent: f32,
    #[serde(default = "default_viewable")]
    pub is_viewable: bool,
}

fn default_viewable() -> bool {
    true
}

impl ViewableItem {
    pub fn new(index: i64, visible_percent: f32) -> Self {
        Self {
            index,
            visible_percent,
            is_viewable: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct PageChange {
    pub from: u32,
    pub to: u32,
}

/// Scroll targets for a programmatic jump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpRequest {
    pub page: u32,
    pub index: usize,
    pub offset: f32,
}

#[derive(Debug, Clone)]
pub struct PageViewportTracker {
    state: TrackerState,
    current_page: u32,
    total_pages: u32,
    page_height: f32,
    pending_jump: Option<JumpRequest>,
    index_retry_used: bool,
}

impl PageViewportTracker {
    pub fn new(total_pages: u32, page_height: f32) -> Self {
        let page_height = if page_height.is_finite() && page_height > 0.0 {
            page_height
        } else {
            1.0
        };
        Self {
            state: TrackerState::Initializing,
            current_page: 1,
            total_pages: total_pages.max(1),
            page_height,
            pending_jump: None,
            index_retry_used: false,
        }
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn page_height(&self) -> f32 {
        self.page_height
    }

    pub fn pending_jump(&self) -> Option<JumpRequest> {
        self.pending_jump
    }

    pub fn clamp_page(&self, page: i64) -> u32 {
        page.clamp(1, i64::from(self.total_pages)) as u32
    }

    pub fn offset_for_page(&self, page: u32) -> f32 {
        page.saturating_sub(1) as f32 * self.page_height
    }

    /// Start tracking at `page` without a jump, for a list that is first
    /// rendered already positioned there.
    pub fn mount_at(&mut self, page: i64) {
        if self.state == TrackerState::Unmounted {
            return;
        }
        self.current_page = self.clamp_page(page);
        self.state = TrackerState::Tracking;
        self.pending_jump = None;
        debug!(page = self.current_page, "Viewport tracking started");
    }

    /// Record a programmatic jump to `page` (clamped into range).
    pub fn begin_jump(&mut self, page: i64) -> Option<JumpRequest> {
        if self.state == TrackerState::Unmounted {
            return None;
        }
        let page = self.clamp_page(page);
        let request = JumpRequest {
            page,
            index: (page - 1) as usize,
            offset: self.offset_for_page(page),
        };
        self.pending_jump = Some(request);
        self.index_retry_used = false;
        debug!(page, offset = request.offset, "Jump requested");
        Some(request)
    }

    /// Whether a failed index scroll for the pending jump may be retried.
    /// Only one retry is granted per jump.
    pub fn allow_index_retry(&mut self) -> bool {
        if self.state == TrackerState::Unmounted || self.pending_jump.is_none() {
            return false;
        }
        if self.index_retry_used {
            return false;
        }
        self.index_retry_used = true;
        true
    }

    /// Finish the pending jump; the first completion moves the tracker
    /// into [`TrackerState::Tracking`].
    pub fn complete_jump(&mut self) -> Option<PageChange> {
        if self.state == TrackerState::Unmounted {
            return None;
        }
        let jump = self.pending_jump.take()?;
        self.state = TrackerState::Tracking;
        self.apply(jump.page)
    }

    /// Feed a viewability sample. The most visible viewable row wins; on a
    /// tie the lowest index wins.
    pub fn observe_viewable(&mut self, items: &[ViewableItem]) -> Option<PageChange> {
        let best = items
            .iter()
            .filter(|item| item.is_viewable && item.visible_percent.is_finite())
            .max_by(|a, b| {
                a.visible_percent
                    .partial_cmp(&b.visible_percent)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| b.index.cmp(&a.index))
            })?;
        trace!(
            index = best.index,
            visible_percent = best.visible_percent,
            "Most visible row"
        );
        self.propose_page(best.index.saturating_add(1))
    }

    /// Feed a raw vertical scroll offset.
    pub fn observe_offset(&mut self, offset_y: f32) -> Option<PageChange> {
        if !offset_y.is_finite() || offset_y < 0.0 {
            return None;
        }
        let index = (offset_y / self.page_height).floor() as i64;
        self.propose_page(index.saturating_add(1))
    }

    /// Accept `page` as current if it is in range and differs from the
    /// current page. Ignored until tracking has started.
    pub fn propose_page(&mut self, page: i64) -> Option<PageChange> {
        if self.state != TrackerState::Tracking {
            return None;
        }
        if page < 1 || page > i64::from(self.total_pages) {
            trace!(page, "Discarding out-of-range page");
            return None;
        }
        self.apply(page as u32)
    }

    pub fn unmount(&mut self) {
        self.state = TrackerState::Unmounted;
        self.pending_jump = None;
    }

    fn apply(&mut self, page: u32) -> Option<PageChange> {
        if page == self.current_page {
            return None;
        }
        let change = PageChange {
            from: self.current_page,
            to: page,
        };
        self.current_page = page;
        debug!(from = change.from, to = change.to, "Current page changed");
        Some(change)
    }
}
