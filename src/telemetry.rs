//! Logging setup.
//!
//! The terminal belongs to the UI, so events go to a log file instead of stdout.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Build a subscriber writing plain-text events to `sink`.
///
/// # Arguments
/// * `filter_level` - Default filter directive, overridden by `RUST_LOG`
/// * `sink` - Writer factory for formatted events
pub fn get_subscriber<Sink>(
    filter_level: &str,
    sink: Sink,
) -> impl Subscriber + Send + Sync + use<Sink>
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_level));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(sink)
        .with_ansi(false)
        .with_target(false);

    Registry::default().with(env_filter).with(fmt_layer)
}

/// Send all events to the log file at `path`, appending.
///
/// # Arguments
/// * `path` - Log file (parent directories are created)
/// * `filter_level` - Default filter directive
///
/// # Returns
/// * `Result<()>` - Error if the file cannot be opened or a global subscriber is already set
pub fn init_file_logging(path: &Path, filter_level: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let subscriber = get_subscriber(filter_level, Mutex::new(file));
    tracing::subscriber::set_global_default(subscriber).context("Failed to set up logging")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_subscriber_writes_to_sink() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.log");
        let file = fs::File::create(&path).unwrap();

        let subscriber = get_subscriber("info", Mutex::new(file));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(rows = 8, "subscribers exported");
            tracing::debug!("filtered out");
        });

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("subscribers exported"));
        assert!(content.contains("rows=8"));
        assert!(!content.contains("filtered out"));
    }
}
