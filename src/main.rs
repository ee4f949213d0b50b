//! Craven test harness CLI entry point

fn main() {
    // Diagnostics go to stderr so they never interleave with reporter output; RUST_LOG overrides the default
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    craven_unittest::cli::run();
}
