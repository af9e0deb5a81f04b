use chrono::Local;
use rand::Rng;

use crate::domain::{Action, LogEntry, User};

/// Produces exactly `count` entries stamped with the current wall-clock time.
pub fn generate_logs<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<LogEntry> {
    (0..count)
        .map(|_| LogEntry::new(Action::random(rng), Local::now()))
        .collect()
}

/// Builds the user for dispatch `index` with a log of `[0, max_log_entries)` entries.
pub fn build_user<R: Rng + ?Sized>(index: usize, max_log_entries: usize, rng: &mut R) -> User {
    let count = if max_log_entries == 0 {
        0
    } else {
        rng.gen_range(0..max_log_entries)
    };
    User::new(index as u64 + 1, generate_logs(count, rng))
}
