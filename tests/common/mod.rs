use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Install a test-local subscriber that honours `RUST_LOG`.
///
/// The returned guard keeps the subscriber active for the current thread only,
/// so parallel tests do not conflict.
pub fn init_test_subscriber() -> tracing::subscriber::DefaultGuard {
    let fmt_layer = fmt::layer().with_target(true).with_test_writer();

    let filter_layer = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .set_default()
}
