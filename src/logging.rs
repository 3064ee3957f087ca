use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Send tracing output to `log_file`, since stdout belongs to the terminal UI.
///
/// The level comes from `RUST_LOG` and defaults to `info`.
pub fn init(log_file: impl AsRef<Path>) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file.as_ref())?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Runs before the alternate screen is entered, so stderr is still visible
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
    {
        eprintln!("Logging to {} is disabled: {}", log_file.as_ref().display(), err);
    }

    Ok(())
}
