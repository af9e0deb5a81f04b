/// Installs the process-wide tracing subscriber.
///
/// Verbosity comes from `RUST_LOG` and defaults to `info`, which shows the
/// per-user progress lines. `RUST_LOG=debug` adds worker lifecycle events.
///
/// Progress lines (`generated user {id}`, `WRITING FILE FOR UID {id}`) are
/// `info!` events, so each one carries the uptime, level and span prefix of
/// the compact format. Only the final `DONE!` summary is printed bare.
pub fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .init();
}
