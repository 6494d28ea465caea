use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Initialize logging for the CLI. Everything goes to stderr so stdout stays
/// clean for command output. `RUST_LOG` wins over `level` when set.
pub fn init_logging(level: Level) {
    let level_str = level.as_str().to_lowercase();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("marketplace={level_str},marketplace_core={level_str}").into()
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
