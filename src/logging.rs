use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{Error, Result};

/// Logs to stderr and to a timestamped file under `log_dir`.
/// `RUST_LOG` overrides the default `info` level.
pub fn setup_logging(log_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(log_dir).map_err(|e| Error::io(log_dir, e))?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_file = log_dir.join(format!("helimap_{}.log", timestamp));
    let file = File::create(&log_file).map_err(|e| Error::io(&log_file, e))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();

    tracing::info!("Logging initialized. Log file: {}", log_file.display());
    Ok(log_file)
}
