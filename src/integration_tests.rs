#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::Duration;

    use chrono::{DateTime, FixedOffset};

    use crate::app_system::PipelineSystem;
    use crate::config::PipelineConfig;
    use crate::domain::Action;
    use crate::error::PipelineError;

    fn config_for(dir: &Path, users: usize, workers: usize) -> PipelineConfig {
        PipelineConfig {
            users_count: users,
            workers_count: workers,
            max_log_entries: 50,
            output_dir: dir.to_path_buf(),
            generation_delay: Duration::from_millis(1),
            write_delay: Duration::from_millis(1),
        }
    }

    /// Parses a report file, asserting its layout, and returns its entries.
    fn parse_report(content: &str, id: u64) -> Vec<(String, DateTime<FixedOffset>)> {
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some(format!("UID: {id}; Email: user{id}@company.com;").as_str())
        );
        assert_eq!(lines.next(), Some("Activity Log:"));
        assert!(content.ends_with('\n'));

        lines
            .enumerate()
            .map(|(expected_index, line)| {
                let (index, rest) = line.split_once(". [").expect("entry index");
                assert_eq!(index.parse::<usize>().unwrap(), expected_index);
                let (action, stamp) = rest.split_once("] at ").expect("entry action");
                let timestamp = DateTime::parse_from_rfc3339(stamp).expect("RFC3339 timestamp");
                (action.to_string(), timestamp)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_three_users_two_workers_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let system = PipelineSystem::start(config_for(dir.path(), 3, 2)).await.unwrap();

        let report = system.run().await.unwrap();
        assert_eq!(report.users_persisted, 3);

        let allowed: Vec<&str> = Action::ALL[..Action::ALL.len() - 1]
            .iter()
            .map(|a| a.label())
            .collect();

        for id in 1..=3u64 {
            let path = dir.path().join(format!("uid{id}.txt"));
            let content = std::fs::read_to_string(&path).unwrap();
            let entries = parse_report(&content, id);

            assert!(entries.len() < 50);
            assert!(entries.iter().all(|(action, _)| allowed.contains(&action.as_str())));
            assert!(entries.windows(2).all(|w| w[0].1 <= w[1].1));
        }
    }

    #[tokio::test]
    async fn test_each_user_persisted_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let system = PipelineSystem::start(config_for(dir.path(), 25, 6)).await.unwrap();

        let report = system.run().await.unwrap();
        assert_eq!(report.users_persisted, 25);

        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        let mut expected: Vec<String> = (1..=25).map(|id| format!("uid{id}.txt")).collect();
        expected.sort();
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn test_rerun_leaves_no_stale_content() {
        let dir = tempfile::tempdir().unwrap();
        let stale = "x".repeat(64 * 1024);
        std::fs::write(dir.path().join("uid1.txt"), &stale).unwrap();

        let system = PipelineSystem::start(config_for(dir.path(), 1, 1)).await.unwrap();
        system.run().await.unwrap();

        let content = std::fs::read_to_string(dir.path().join("uid1.txt")).unwrap();
        assert!(!content.contains('x'));
        parse_report(&content, 1);
    }

    #[tokio::test]
    async fn test_open_failure_aborts_run_without_completing_unit() {
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("uid2.txt");
        std::fs::create_dir(&blocked).unwrap();

        let system = PipelineSystem::start(config_for(dir.path(), 3, 2)).await.unwrap();
        let err = tokio::time::timeout(Duration::from_secs(10), system.run())
            .await
            .expect("failed run should still join its workers")
            .unwrap_err();

        assert!(matches!(err, PipelineError::OpenReport { user_id: 2, .. }));
        assert!(blocked.is_dir());

        let written = std::fs::read_dir(dir.path())
            .unwrap()
            .filter(|entry| entry.as_ref().unwrap().path().is_file())
            .count();
        assert!(written <= 2);
    }
}
