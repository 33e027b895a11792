use std::time::Duration;
use thiserror::Error;

/// The virtualized page list the reader drives.
pub trait ScrollHost {
    fn scroll_to_offset(&mut self, offset: f32, animated: bool);

    /// Fails when the row has not been measured yet.
    fn scroll_to_index(&mut self, index: usize, animated: bool) -> Result<(), ScrollToIndexError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("scroll to index {index} failed (highest measured frame {highest_measured_frame_index})")]
pub struct ScrollToIndexError {
    pub index: usize,
    pub highest_measured_frame_index: usize,
}

/// Delays in the jump sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpTiming {
    /// Between the offset scroll and the index scroll.
    pub fallback: Duration,
    /// Before retrying a failed index scroll.
    pub retry: Duration,
}

impl Default for JumpTiming {
    fn default() -> Self {
        Self {
            fallback: Duration::from_millis(500),
            retry: Duration::from_millis(1000),
        }
    }
}
