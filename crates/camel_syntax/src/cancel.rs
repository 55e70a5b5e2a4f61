//! Cooperative cancellation.
//!
//! Long parses poll a [`Cancellation`] at statement boundaries and bail out with
//! [`crate::ParseError::Cancelled`]. Any partially built tree is dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Something the parser can ask "should I stop?".
pub trait Cancellation {
    fn is_cancelled(&self) -> bool;
}

/// Never cancels. Used by the plain entry points.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl Cancellation for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Shared flag set from another thread (an editor's "a newer edit arrived").
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

impl Cancellation for CancellationFlag {
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
