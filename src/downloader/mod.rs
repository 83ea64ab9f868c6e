//! Core downloader implementation split into focused submodules.
//!
//! The `PlaylistDownloader` struct and its methods are organized by
//! orchestration:
//! - `count` - playlist item-count probe
//! - `download` - chunked download orchestration
//! - `details` - chunked detail-dump orchestration
//! - `handle` - per-orchestration event handles

mod count;
mod details;
mod download;
mod handle;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use handle::{DetailsHandle, DownloadHandle};

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::process::{SharedSpawner, YtdlpSpawner};

/// Name searched for on PATH when no explicit executable is configured
const EXECUTABLE_NAME: &str = "yt-dlp";

/// Main downloader instance (cloneable - all fields are Arc-wrapped)
///
/// One instance can serve any number of concurrent orchestration calls;
/// the configuration and executable path are process-wide, read-only
/// state, and each call owns everything else it touches.
#[derive(Clone)]
pub struct PlaylistDownloader {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Process launcher (trait object for pluggable implementations)
    pub(crate) spawner: SharedSpawner,
}

impl PlaylistDownloader {
    /// Create a downloader from a configuration.
    ///
    /// Uses the configured executable path when set, otherwise discovers
    /// `yt-dlp` on PATH.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExecutableNotFound`] when no path is configured
    /// and discovery fails.
    pub fn new(config: Config) -> Result<Self> {
        let executable = match &config.executable {
            Some(path) => path.clone(),
            None => which::which(EXECUTABLE_NAME).map_err(|_| Error::ExecutableNotFound)?,
        };
        Ok(Self::with_executable(executable, config))
    }

    /// Create a downloader with an explicit executable path.
    ///
    /// No discovery or existence check is performed; a bad path surfaces
    /// as a spawn failure on first use.
    pub fn with_executable(executable: PathBuf, config: Config) -> Self {
        let spawner = Arc::new(YtdlpSpawner::new(executable, &config));
        Self {
            config: Arc::new(config),
            spawner,
        }
    }

    /// Attempt to find `yt-dlp` in PATH and build a default-configured
    /// downloader from it.
    ///
    /// Returns `None` if the binary is not found.
    pub fn from_path() -> Option<Self> {
        which::which(EXECUTABLE_NAME)
            .ok()
            .map(|path| Self::with_executable(path, Config::default()))
    }

    /// Test constructor with an injected process spawner.
    #[cfg(test)]
    pub(crate) fn with_spawner(spawner: SharedSpawner, config: Config) -> Self {
        Self {
            config: Arc::new(config),
            spawner,
        }
    }
}
