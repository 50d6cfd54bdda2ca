//! Cancellable repeating frame task.
//!
//! The animation loop re-arms itself every frame. A [`FrameTask`] is the
//! handle for that loop: once [`cancel`](FrameTask::cancel) is called, no
//! further iteration runs, even one the host had already queued.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct TaskState {
    cancelled: Cell<bool>,
    iterations: Cell<u64>,
}

/// Handle to a self-rescheduling frame callback.
///
/// Clones share state, so the host can hold one to check before
/// dispatching a queued frame.
#[derive(Debug, Clone, Default)]
pub struct FrameTask {
    state: Rc<TaskState>,
}

impl FrameTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the loop. Idempotent.
    pub fn cancel(&self) {
        self.state.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.get()
    }

    /// Iterations run so far.
    pub fn iterations(&self) -> u64 {
        self.state.iterations.get()
    }

    /// Run one iteration unless cancelled. Returns whether `body` ran.
    pub fn run<F: FnOnce()>(&self, body: F) -> bool {
        if self.is_cancelled() {
            return false;
        }
        body();
        self.state.iterations.set(self.state.iterations.get() + 1);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_until_cancelled() {
        let task = FrameTask::new();
        let mut ran = 0;
        assert!(task.run(|| ran += 1));
        assert!(task.run(|| ran += 1));

        let host_copy = task.clone();
        task.cancel();
        assert!(!host_copy.run(|| ran += 1));
        assert_eq!(ran, 2);
        assert_eq!(host_copy.iterations(), 2);
        assert!(host_copy.is_cancelled());
    }
}
