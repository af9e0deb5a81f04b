use std::fmt::Write as _;

use chrono::{DateTime, Local, SecondsFormat};

use super::Action;

/// A single timestamped entry in a user's activity log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub action: Action,
    pub timestamp: DateTime<Local>,
}

impl LogEntry {
    pub fn new(action: Action, timestamp: DateTime<Local>) -> Self {
        Self { action, timestamp }
    }
}

/// A synthetic user together with its activity log.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub logs: Vec<LogEntry>,
}

impl User {
    /// Creates a user whose email is derived from `id`.
    pub fn new(id: u64, logs: Vec<LogEntry>) -> Self {
        Self {
            id,
            email: Self::email_for(id),
            logs,
        }
    }

    pub fn email_for(id: u64) -> String {
        format!("user{id}@company.com")
    }

    /// Renders the plain-text activity report written to the user's file.
    ///
    /// # Format
    /// ```text
    /// UID: {id}; Email: {email};
    /// Activity Log:
    /// {index}. [{action}] at {RFC3339 timestamp}
    /// ```
    /// Entry indices are zero-based and every line ends with a newline.
    pub fn activity_report(&self) -> String {
        let mut output = format!("UID: {}; Email: {};\nActivity Log:\n", self.id, self.email);
        for (index, entry) in self.logs.iter().enumerate() {
            // Writing into a String cannot fail.
            let _ = writeln!(
                output,
                "{}. [{}] at {}",
                index,
                entry.action,
                entry.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
            );
        }
        output
    }
}
