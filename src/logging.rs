//! Log setup. The terminal belongs to the UI, so logs only go to a file.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "weather_dashboard=info";

/// Install a plain-text subscriber writing to `path`, filtered by `RUST_LOG`.
/// Without a path nothing is installed and `tracing` macros are no-ops.
pub fn init(path: Option<&Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| io::Error::other(format!("log setup failed: {e}")))?;

    tracing::info!(path = %path.display(), "Logging started");
    Ok(())
}
