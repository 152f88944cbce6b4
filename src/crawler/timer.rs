//! Waiting capability used for page pacing and poll cadence
//!
//! Traversal and the poll loop never call `tokio::time` directly; they go
//! through a [`Timer`] so tests can run whole poll cycles without real delays.

use std::future::Future;
use std::time::Duration;

/// Something that can wait for a duration
pub trait Timer: Clone {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Wall-clock timer backed by the tokio runtime
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}
