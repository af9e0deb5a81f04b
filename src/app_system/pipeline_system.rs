use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_channel::Sender;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::generation::GenerationWorker;
use crate::persistence::PersistenceWorker;
use crate::sync::CompletionBarrier;

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineReport {
    pub users_persisted: usize,
    pub elapsed: Duration,
}

/// Owns both worker pools, the channels between them and the completion barrier.
///
/// Every unit of work moves Pending → Generating → Generated → Persisting and
/// ends either Done (barrier signalled) or Fatal (run cancelled).
pub struct PipelineSystem {
    config: PipelineConfig,
    indices: Sender<usize>,
    barrier: Arc<CompletionBarrier>,
    cancel: CancellationToken,
    workers: JoinSet<Result<(), PipelineError>>,
    started: Instant,
}

impl PipelineSystem {
    /// Prepares the output directory and starts both worker pools.
    #[instrument(name = "pipeline_system", skip(config), fields(users = config.users_count, workers = config.workers_count))]
    pub async fn start(config: PipelineConfig) -> Result<Self, PipelineError> {
        let started = Instant::now();
        info!("Starting pipeline");

        // Nothing would ever signal the barrier.
        if config.workers_count == 0 {
            return Err(PipelineError::EmptyWorkerPool);
        }

        tokio::fs::create_dir_all(&config.output_dir)
            .await
            .map_err(|source| PipelineError::CreateOutputDir {
                path: config.output_dir.clone(),
                source,
            })?;

        let (indices, index_rx) = async_channel::bounded(config.channel_capacity());
        let (users_tx, users_rx) = async_channel::bounded(config.channel_capacity());
        let barrier = Arc::new(CompletionBarrier::new());
        let cancel = CancellationToken::new();
        let mut workers = JoinSet::new();

        let remaining = Arc::new(AtomicUsize::new(config.workers_count));
        for id in 0..config.workers_count {
            let worker = GenerationWorker::new(
                id,
                index_rx.clone(),
                users_tx.clone(),
                Arc::clone(&remaining),
                config.max_log_entries,
                config.generation_delay,
                cancel.clone(),
            );
            workers.spawn(async move {
                worker.run().await;
                Ok(())
            });
        }
        // Only generation workers may hold user senders from here on.
        drop(users_tx);

        for id in 0..config.workers_count {
            let worker = PersistenceWorker::new(
                id,
                users_rx.clone(),
                config.output_dir.clone(),
                config.write_delay,
                Arc::clone(&barrier),
                cancel.clone(),
            );
            workers.spawn(worker.run());
        }

        info!("Worker pools started");
        Ok(Self {
            config,
            indices,
            barrier,
            cancel,
            workers,
            started,
        })
    }

    /// Dispatches every index, waits for all of them to be persisted and joins
    /// every worker. Never returns while a worker is still running.
    #[instrument(name = "pipeline_run", skip(self))]
    pub async fn run(self) -> Result<PipelineReport, PipelineError> {
        let PipelineSystem {
            config,
            indices,
            barrier,
            cancel,
            mut workers,
            started,
        } = self;

        dispatch(config.users_count, indices, &barrier, &cancel).await;

        let mut first_error = None;
        loop {
            tokio::select! {
                _ = barrier.wait() => {
                    info!(completed = barrier.completed(), "All users persisted");
                    break;
                }
                _ = cancel.cancelled() => {
                    error!("Pipeline cancelled");
                    break;
                }
                Some(joined) = workers.join_next() => {
                    if let Some(e) = worker_error(joined) {
                        cancel.cancel();
                        first_error = Some(e);
                        break;
                    }
                }
            }
        }

        while let Some(joined) = workers.join_next().await {
            if let Some(e) = worker_error(joined) {
                cancel.cancel();
                first_error.get_or_insert(e);
            }
        }
        debug!("All workers joined");

        match first_error {
            Some(e) => Err(e),
            None => Ok(PipelineReport {
                users_persisted: barrier.completed(),
                elapsed: started.elapsed(),
            }),
        }
    }
}

/// Seeds the index stream. Each unit is registered on the barrier before it
/// is sent, and the stream is closed once every index is queued.
#[instrument(skip(indices, barrier, cancel))]
async fn dispatch(
    count: usize,
    indices: Sender<usize>,
    barrier: &CompletionBarrier,
    cancel: &CancellationToken,
) {
    for index in 0..count {
        barrier.register();
        let sent = tokio::select! {
            _ = cancel.cancelled() => break,
            sent = indices.send(index) => sent,
        };
        if sent.is_err() {
            error!(index, "Index stream closed before dispatch finished");
            break;
        }
    }
    indices.close();
    debug!(registered = barrier.pending(), "Dispatch complete");
}

fn worker_error(joined: Result<Result<(), PipelineError>, JoinError>) -> Option<PipelineError> {
    match joined {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(e),
        Err(join_err) => {
            error!(error = %join_err, "Worker task panicked");
            Some(PipelineError::WorkerPanicked(join_err))
        }
    }
}
