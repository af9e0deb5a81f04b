//! Generation stage: turns dispatched indices into fully built users.

pub mod factory;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_channel::{Receiver, Sender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::domain::User;
pub use factory::*;

/// One member of the generation pool.
///
/// Each worker owns a clone of the user sender. The user channel closes when
/// the last clone is dropped, which `remaining` makes observable.
pub struct GenerationWorker {
    id: usize,
    indices: Receiver<usize>,
    users: Sender<User>,
    remaining: Arc<AtomicUsize>,
    max_log_entries: usize,
    delay: Duration,
    cancel: CancellationToken,
}

impl GenerationWorker {
    pub fn new(
        id: usize,
        indices: Receiver<usize>,
        users: Sender<User>,
        remaining: Arc<AtomicUsize>,
        max_log_entries: usize,
        delay: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            indices,
            users,
            remaining,
            max_log_entries,
            delay,
            cancel,
        }
    }

    #[instrument(name = "generation_worker", skip(self), fields(worker_id = self.id))]
    pub async fn run(self) {
        debug!("Generation worker starting");

        loop {
            let index = tokio::select! {
                _ = self.cancel.cancelled() => break,
                received = self.indices.recv() => match received {
                    Ok(index) => index,
                    Err(_) => break,
                },
            };

            let user = build_user(index, self.max_log_entries, &mut rand::thread_rng());
            let user_id = user.id;

            let sent = tokio::select! {
                _ = self.cancel.cancelled() => break,
                sent = self.users.send(user) => sent,
            };
            if sent.is_err() {
                debug!(user_id, "User stream closed, dropping generated user");
                break;
            }
            info!("generated user {}", user_id);

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.delay) => {}
            }
        }

        self.finish();
    }

    fn finish(self) {
        if self.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            info!("Last generation worker finished, closing user stream");
            self.users.close();
        }
        debug!("Generation worker stopped");
    }
}
