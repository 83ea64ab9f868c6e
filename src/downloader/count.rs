//! Playlist item-count probe
//!
//! One simulate-only invocation that prints the playlist's item count as a
//! single line. The tool keeps enumerating after that line, so the probe
//! terminates the process as soon as the first value arrives; any output
//! still in flight after that is ignored.

use super::PlaylistDownloader;
use crate::error::{Error, Result};
use crate::process::{ProcessEvent, exit_outcome};

impl PlaylistDownloader {
    /// Resolve the number of items in the collection behind `url`.
    ///
    /// Output that does not parse as a non-negative integer (a single,
    /// non-playlist item reports `NA`) resolves to 1 rather than failing.
    ///
    /// # Errors
    ///
    /// Fails on spawn failure, stderr output, or a non-{0,1} exit code
    /// observed before the first value; failures after the value has been
    /// seen are ignored.
    pub async fn playlist_count(&self, url: &str) -> Result<u64> {
        let args = vec![
            "--simulate".to_string(),
            "-O".to_string(),
            "%(playlist_count)s".to_string(),
            url.to_string(),
        ];

        let mut handle = self.spawner.spawn(&args).await?;

        while let Some(event) = handle.recv().await {
            match event {
                ProcessEvent::Stdout(bytes) => {
                    let text = String::from_utf8_lossy(&bytes);
                    let count = text.trim().parse::<u64>().unwrap_or(1);

                    // First value is authoritative; stop the enumeration
                    // and let anything already in flight fall on the floor.
                    handle.terminate();
                    tracing::debug!(url, count, "resolved playlist count");
                    return Ok(count);
                }
                ProcessEvent::Stderr(bytes) => return Err(Error::stderr(bytes)),
                ProcessEvent::Exited(code) => {
                    exit_outcome(code)?;
                    // Clean exit without any output: single item.
                    return Ok(1);
                }
            }
        }

        Ok(1)
    }
}
