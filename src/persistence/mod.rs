//! Persistence stage: writes each generated user's activity report to disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_channel::Receiver;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use crate::domain::User;
use crate::error::PipelineError;
use crate::sync::CompletionBarrier;

/// Path of the report file for `user_id` inside `output_dir`.
pub fn report_path(output_dir: &Path, user_id: u64) -> PathBuf {
    output_dir.join(format!("uid{user_id}.txt"))
}

/// Writes `user`'s report to `path`, replacing any previous content.
#[instrument(fields(user_id = user.id, path = %path.display()), skip(user, path))]
pub async fn write_report(user: &User, path: &Path) -> Result<(), PipelineError> {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o644);

    let mut file = options
        .open(path)
        .await
        .map_err(|source| PipelineError::OpenReport {
            user_id: user.id,
            path: path.to_path_buf(),
            source,
        })?;

    let write_err = |source: std::io::Error| PipelineError::WriteReport {
        user_id: user.id,
        path: path.to_path_buf(),
        source,
    };
    file.write_all(user.activity_report().as_bytes())
        .await
        .map_err(write_err)?;
    file.flush().await.map_err(write_err)?;

    debug!("Report written");
    Ok(())
}

/// One member of the persistence pool.
pub struct PersistenceWorker {
    id: usize,
    users: Receiver<User>,
    output_dir: PathBuf,
    delay: Duration,
    barrier: Arc<CompletionBarrier>,
    cancel: CancellationToken,
}

impl PersistenceWorker {
    pub fn new(
        id: usize,
        users: Receiver<User>,
        output_dir: PathBuf,
        delay: Duration,
        barrier: Arc<CompletionBarrier>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            users,
            output_dir,
            delay,
            barrier,
            cancel,
        }
    }

    /// Drains the user stream until it closes or the run is cancelled.
    ///
    /// A failed write cancels the run and is returned without signalling
    /// completion for that user.
    #[instrument(name = "persistence_worker", skip(self), fields(worker_id = self.id))]
    pub async fn run(self) -> Result<(), PipelineError> {
        debug!("Persistence worker starting");

        loop {
            let user = tokio::select! {
                _ = self.cancel.cancelled() => break,
                received = self.users.recv() => match received {
                    Ok(user) => user,
                    Err(_) => break,
                },
            };

            info!("WRITING FILE FOR UID {}", user.id);
            let path = report_path(&self.output_dir, user.id);
            if let Err(e) = write_report(&user, &path).await {
                error!(error = %e, "Fatal write failure, cancelling run");
                self.cancel.cancel();
                return Err(e);
            }

            tokio::time::sleep(self.delay).await;
            self.barrier.done();
        }

        debug!("Persistence worker stopped");
        Ok(())
    }
}
