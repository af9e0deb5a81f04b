mod app_system;
mod config;
mod domain;
mod error;
mod generation;
mod persistence;
mod sync;

#[cfg(test)]
mod integration_tests;

use std::process::ExitCode;
use std::time::Instant;

use tracing::{error, info};

use crate::app_system::{setup_tracing, PipelineReport, PipelineSystem};
use crate::config::PipelineConfig;
use crate::error::PipelineError;

/// Generates the configured population and writes one report per user.
async fn run_pipeline(config: PipelineConfig) -> Result<PipelineReport, PipelineError> {
    PipelineSystem::start(config).await?.run().await
}

#[tokio::main]
async fn main() -> ExitCode {
    let started = Instant::now();
    setup_tracing();

    match run_pipeline(PipelineConfig::default()).await {
        Ok(report) => {
            info!(
                users_persisted = report.users_persisted,
                pipeline_ms = report.elapsed.as_millis() as u64,
                "Pipeline completed"
            );
            println!(
                "DONE! Time Elapsed: {:.2} seconds",
                started.elapsed().as_secs_f64()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, user_id = ?e.user_id(), "Pipeline aborted");
            ExitCode::FAILURE
        }
    }
}
