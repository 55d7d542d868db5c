//! Logging setup.
//!
//! A terminal UI owns stdout, so log output goes to a file. The level comes
//! from `RUST_LOG` (e.g. `RUST_LOG=boxterm=debug`), defaulting to `info`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::Result;

/// Install a global fmt subscriber that appends to `path`.
///
/// Returns an error if the file cannot be opened. Calling it twice is
/// harmless: the second subscriber is rejected and the first stays active.
pub fn init_file_logging(path: impl AsRef<Path>) -> Result<()> {
    let log_file = OpenOptions::new().create(true).append(true).open(path.as_ref())?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_thread_names(true)
        .try_init();

    Ok(())
}
