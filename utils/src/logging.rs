//! Structured logging initialization via `tracing`.

/// Install a `RUST_LOG`-filtered subscriber writing to the test
/// capture. Tolerant of repeated calls, so every test can invoke it.
pub fn init_test_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
