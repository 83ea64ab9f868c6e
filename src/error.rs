//! Error types for playlist-dl
//!
//! One `Error` enum covers every failure the library can surface. Variants
//! carry enough context (exit code, raw stderr bytes, executable path) for a
//! caller to diagnose a failing orchestration without re-running it.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for playlist-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for playlist-dl
///
/// Failures are surfaced exactly once: either as the error half of a
/// `Result`, or as a task-failure / terminal-failure event on an
/// orchestration handle. Nothing is retried internally.
#[derive(Debug, Error)]
pub enum Error {
    /// The external executable could not be launched
    #[error("failed to spawn {executable}: {source}")]
    Spawn {
        /// Path of the executable that failed to launch
        executable: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// The external executable was not found on PATH
    ///
    /// Returned by [`crate::PlaylistDownloader::new`] when discovery
    /// fails and no explicit path was configured.
    #[error("yt-dlp executable not found in PATH")]
    ExecutableNotFound,

    /// The process exited with a code that is neither 0 nor 1
    ///
    /// Exit code 1 is deliberately treated as success because interrupting
    /// the probe process surfaces as code 1 on some platforms; the mapping
    /// lives in one place next to the process runner.
    #[error("process exited with code {code}")]
    ExitCode {
        /// The observed exit code
        code: i32,
    },

    /// The process emitted bytes on its error channel, or died to a signal
    ///
    /// The message is generic by design: stderr content is never
    /// interpreted, only forwarded raw in `data`.
    #[error("process failed: {message}")]
    Process {
        /// Fixed, human-readable failure message
        message: String,
        /// Raw stderr bytes, when any were captured
        data: Option<Vec<u8>>,
    },

    /// A structured item record failed to parse
    ///
    /// A malformed dump-json line aborts the chunk task that produced it;
    /// this is never downgraded to a default value.
    #[error("invalid item record: {0}")]
    InvalidRecord(#[from] serde_json::Error),
}

impl Error {
    /// Fixed message used when stderr bytes are observed.
    ///
    /// The message stays generic on purpose: the library does not attempt
    /// to interpret what the tool wrote to stderr.
    pub(crate) fn stderr(data: Vec<u8>) -> Self {
        Self::Process {
            message: "process failed due to unknown error".to_string(),
            data: Some(data),
        }
    }

    /// Failure for a child that was terminated by a signal we did not send.
    pub(crate) fn signalled() -> Self {
        Self::Process {
            message: "process terminated by signal".to_string(),
            data: None,
        }
    }

    /// Raw diagnostic bytes attached to this error, if any.
    pub fn data(&self) -> Option<&[u8]> {
        match self {
            Self::Process { data, .. } => data.as_deref(),
            _ => None,
        }
    }
}
