//! Process-wide shutdown flag
//!
//! Set once by the signal task, polled by the session loop after each record
//! and while sleeping before a reconnect. Never cleared.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative shutdown flag shared between the signal task and the loop
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    inner: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown; idempotent
    pub fn trigger(&self) {
        self.inner.store(true, Ordering::Release);
    }

    /// Whether shutdown has been requested
    #[inline]
    pub fn is_set(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }
}
