//! Rotation strategies that pick the starting credential of a logical request
//!
//! A strategy is consulted exactly once per logical request. Retries inside
//! that request step forward from the drawn base instead of drawing again.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

pub trait RotationStrategy: Send + Sync {
    /// Base offset into a pool of `pool_size` credentials; 0 for an empty pool
    fn next_base(&self, pool_size: usize) -> usize;

    fn name(&self) -> &'static str;
}

/// Counter-based rotation
///
/// Sequential requests start at 0, 1, 2, ... modulo the pool size. The
/// cursor is advanced with an atomic get-and-increment, so concurrent
/// requests never draw the same base within one cycle.
#[derive(Debug, Default)]
pub struct CounterRotation {
    cursor: AtomicUsize,
}

impl CounterRotation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the cursor at `position` (reduced modulo the pool size on use)
    pub fn starting_at(position: usize) -> Self {
        Self {
            cursor: AtomicUsize::new(position),
        }
    }

    pub fn reset(&self) {
        self.cursor.store(0, Ordering::SeqCst);
    }
}

impl RotationStrategy for CounterRotation {
    fn next_base(&self, pool_size: usize) -> usize {
        if pool_size == 0 {
            return 0;
        }
        let previous = self
            .cursor
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cursor| {
                Some((cursor % pool_size + 1) % pool_size)
            })
            .unwrap_or_else(|cursor| cursor);
        previous % pool_size
    }

    fn name(&self) -> &'static str {
        "counter"
    }
}

type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Wall-clock bucket rotation
///
/// Every request inside one window of `window` length shares a base;
/// consecutive windows step through the pool. No shared mutable state.
pub struct TimeBucketRotation {
    window_seconds: i64,
    clock: Clock,
}

impl TimeBucketRotation {
    pub fn new(window: Duration) -> Self {
        Self::with_clock(window, || chrono::Utc::now().timestamp())
    }

    /// Use a custom unix-seconds clock
    pub fn with_clock<F>(window: Duration, clock: F) -> Self
    where
        F: Fn() -> i64 + Send + Sync + 'static,
    {
        Self {
            window_seconds: window.as_secs().max(1) as i64,
            clock: Arc::new(clock),
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds as u64)
    }
}

impl std::fmt::Debug for TimeBucketRotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeBucketRotation")
            .field("window_seconds", &self.window_seconds)
            .finish_non_exhaustive()
    }
}

impl RotationStrategy for TimeBucketRotation {
    fn next_base(&self, pool_size: usize) -> usize {
        if pool_size == 0 {
            return 0;
        }
        let bucket = (self.clock)().div_euclid(self.window_seconds);
        bucket.rem_euclid(pool_size as i64) as usize
    }

    fn name(&self) -> &'static str {
        "time_bucket"
    }
}
