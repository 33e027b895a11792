use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("reader session ended before {stage}")]
pub struct SessionEnded {
    pub stage: &'static str,
}

/// Liveness of one reader visit, shared with whoever may end it.
///
/// Jump steps resume after fixed delays; each checks this first and bails
/// out once the screen is gone. Release is one-way.
#[derive(Clone, Debug, Default)]
pub struct SessionLifetime {
    released: Arc<AtomicBool>,
}

impl SessionLifetime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the session gone. Returns `false` if it already was.
    pub fn release(&self) -> bool {
        !self.released.swap(true, Ordering::AcqRel)
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    pub fn ensure_active(&self, stage: &'static str) -> Result<(), SessionEnded> {
        if self.is_released() {
            return Err(SessionEnded { stage });
        }
        Ok(())
    }
}
