use std::path::PathBuf;
use std::time::Duration;

/// Number of users generated per run.
pub const USERS_COUNT: usize = 100;
/// Workers spawned for each pipeline stage.
pub const WORKERS_COUNT: usize = 100;
/// Exclusive upper bound on log entries per user.
pub const MAX_LOG_ENTRIES: usize = 1000;
pub const OUTPUT_DIR: &str = "users";
pub const GENERATION_DELAY: Duration = Duration::from_millis(100);
pub const WRITE_DELAY: Duration = Duration::from_secs(1);

/// Settings for one pipeline run. The binary always runs with [`Default`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub users_count: usize,
    pub workers_count: usize,
    pub max_log_entries: usize,
    pub output_dir: PathBuf,
    pub generation_delay: Duration,
    pub write_delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            users_count: USERS_COUNT,
            workers_count: WORKERS_COUNT,
            max_log_entries: MAX_LOG_ENTRIES,
            output_dir: PathBuf::from(OUTPUT_DIR),
            generation_delay: GENERATION_DELAY,
            write_delay: WRITE_DELAY,
        }
    }
}

impl PipelineConfig {
    /// Capacity of both stage channels. Bounded channels reject zero.
    pub(crate) fn channel_capacity(&self) -> usize {
        self.users_count.max(1)
    }
}
