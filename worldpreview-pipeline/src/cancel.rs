use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Cooperative cancellation token shared between the control loop and
/// the worker, plus row-progress counters for host display.
///
/// Cancellation is generation-based: advancing the generation signals
/// the in-flight scan to stop at its next per-row check. A worker
/// captures the generation when it starts and treats any later mismatch
/// as supersession. This is the only synchronization state shared
/// between the two threads.
#[derive(Debug)]
pub struct TaskCancel {
    generation: AtomicU64,
    rows_done: AtomicUsize,
    rows_total: AtomicUsize,
}

impl TaskCancel {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            rows_done: AtomicUsize::new(0),
            rows_total: AtomicUsize::new(0),
        }
    }

    /// Cancel the current scan by advancing the generation.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Read the current generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Reset progress for a new scan over `total` rows.
    pub fn begin_rows(&self, total: usize) {
        self.rows_total.store(total, Ordering::Relaxed);
        self.rows_done.store(0, Ordering::Relaxed);
    }

    /// Mark one row as completed.
    pub fn row_done(&self) {
        self.rows_done.fetch_add(1, Ordering::Relaxed);
    }

    /// Current progress as `(rows done, rows total)`.
    pub fn progress(&self) -> (usize, usize) {
        (
            self.rows_done.load(Ordering::Relaxed),
            self.rows_total.load(Ordering::Relaxed),
        )
    }
}

impl Default for TaskCancel {
    fn default() -> Self {
        Self::new()
    }
}
