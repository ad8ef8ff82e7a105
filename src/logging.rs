use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming the log file.
pub const LOG_ENV_VAR: &str = "MVU_LOG";

/// Initialize tracing with optional file output.
///
/// Logging is disabled by default so a terminal host's screen is not
/// corrupted. Set `MVU_LOG` to a file path to enable it; the level comes from
/// `RUST_LOG` and defaults to `info`.
///
/// Log files get unique names so concurrent instances do not clobber each
/// other: `{path}.{timestamp}.{pid}`. Returns the path written to, if any.
pub fn init_tracing() -> Option<String> {
    let log_path = std::env::var(LOG_ENV_VAR).ok()?;

    let pid = std::process::id();
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let unique_path = format!("{}.{}.{}", log_path, timestamp, pid);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Ok(file) = std::fs::File::create(&unique_path) else {
        eprintln!("Warning: Failed to create log file: {}", unique_path);
        return None;
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    Some(unique_path)
}
