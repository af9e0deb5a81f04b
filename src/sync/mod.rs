//! Completion barrier shared by the dispatcher and the persistence workers.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::watch;
use tracing::error;

/// Counts outstanding units of work and lets a caller wait until none remain.
///
/// Every unit must be [`register`](Self::register)ed before it becomes visible
/// to a worker, otherwise [`wait`](Self::wait) may return early.
#[derive(Debug)]
pub struct CompletionBarrier {
    pending: watch::Sender<usize>,
    completed: AtomicUsize,
}

impl Default for CompletionBarrier {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionBarrier {
    pub fn new() -> Self {
        let (pending, _) = watch::channel(0);
        Self {
            pending,
            completed: AtomicUsize::new(0),
        }
    }

    /// Adds one expected unit.
    pub fn register(&self) {
        self.pending.send_modify(|pending| *pending += 1);
    }

    /// Marks one unit complete. Returns `false` if nothing was pending.
    pub fn done(&self) -> bool {
        let mut accepted = false;
        self.pending.send_if_modified(|pending| {
            if *pending == 0 {
                return false;
            }
            *pending -= 1;
            accepted = true;
            true
        });

        if accepted {
            self.completed.fetch_add(1, Ordering::SeqCst);
        } else {
            error!("Completion signalled with no registered work");
        }
        accepted
    }

    /// Suspends until every registered unit has been marked complete.
    pub async fn wait(&self) {
        let mut rx = self.pending.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|pending| *pending == 0).await;
    }

    pub fn pending(&self) -> usize {
        *self.pending.borrow()
    }

    /// Total completions accepted since creation.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}
