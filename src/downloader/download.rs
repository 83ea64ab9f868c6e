//! Download orchestration — one process invocation per playlist item
//!
//! Count probe → singleton chunk plan → bounded task queue → per-item
//! yt-dlp invocation. Each task's stdout is line-assembled and every
//! matching progress line is emitted immediately, tagged with the item's
//! range. A failing task emits a non-terminal `TaskFailed` event and does
//! not halt siblings; after the idle signal exactly one terminal event
//! fires.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use super::PlaylistDownloader;
use super::handle::DownloadHandle;
use crate::chunk::{self, ChunkRange};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::process::{ProcessEvent, SharedSpawner, exit_outcome};
use crate::progress;
use crate::queue::TaskQueue;
use crate::types::DownloadEvent;
use crate::utils::LineAssembler;

/// Temporally-first task failure, shared across sibling tasks.
///
/// The terminal `Failed` event carries the first error *observed*, which
/// under concurrency is not necessarily the lowest-indexed task's.
pub(super) type FirstError = Arc<Mutex<Option<(String, Option<Vec<u8>>)>>>;

/// Record an error into the slot unless one is already there.
pub(super) fn record_first(slot: &FirstError, message: String, data: Option<Vec<u8>>) {
    if let Ok(mut guard) = slot.lock()
        && guard.is_none()
    {
        *guard = Some((message, data));
    }
}

impl PlaylistDownloader {
    /// Download every item of the collection behind `url`.
    ///
    /// Returns immediately with an event-bearing handle; the orchestration
    /// runs on a detached task. Dropping the handle abandons the event
    /// stream but does not stop in-flight external processes.
    pub fn download(&self, url: &str) -> DownloadHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let this = self.clone();
        let url = url.to_string();
        tokio::spawn(async move { this.run_download(url, tx).await });
        DownloadHandle::new(rx)
    }

    /// Download every item and wait for the terminal event.
    ///
    /// Convenience wrapper over [`PlaylistDownloader::download`] that
    /// discards non-terminal events.
    ///
    /// # Errors
    ///
    /// Returns the terminal failure when any item task failed.
    pub async fn download_and_wait(&self, url: &str) -> Result<()> {
        self.download(url).wait().await
    }

    async fn run_download(self, url: String, tx: mpsc::UnboundedSender<DownloadEvent>) {
        let count = match self.playlist_count(&url).await {
            Ok(count) => count,
            Err(e) => {
                let data = e.data().map(<[u8]>::to_vec);
                let _ = tx.send(DownloadEvent::Failed {
                    message: e.to_string(),
                    data,
                });
                return;
            }
        };

        let ranges = chunk::plan_singletons(count);
        let first_error: FirstError = Arc::new(Mutex::new(None));
        let mut queue = TaskQueue::new(self.config.download_concurrency);

        for range in ranges {
            let spawner = Arc::clone(&self.spawner);
            let config = Arc::clone(&self.config);
            let url = url.clone();
            let tx = tx.clone();
            let first_error = Arc::clone(&first_error);

            queue.push(async move {
                if let Err(e) = run_item_task(&spawner, &config, &url, range, &tx).await {
                    tracing::warn!(%range, error = %e, "download task failed");
                    let data = e.data().map(<[u8]>::to_vec);
                    record_first(&first_error, e.to_string(), data.clone());
                    let _ = tx.send(DownloadEvent::TaskFailed {
                        range,
                        message: e.to_string(),
                        data,
                    });
                }
            });
        }

        tracing::debug!(%url, count, tasks = queue.len(), "planned download");

        // Resolves at the queue's idle signal, after every task settled.
        queue.run().await;

        let failure = first_error.lock().ok().and_then(|mut guard| guard.take());
        let _ = match failure {
            Some((message, data)) => tx.send(DownloadEvent::Failed { message, data }),
            None => tx.send(DownloadEvent::Completed),
        };
    }
}

/// Run one per-item invocation and stream its progress.
async fn run_item_task(
    spawner: &SharedSpawner,
    config: &Config,
    url: &str,
    range: ChunkRange,
    tx: &mpsc::UnboundedSender<DownloadEvent>,
) -> Result<()> {
    let args = vec![
        "--playlist-start".to_string(),
        range.start.to_string(),
        "--playlist-end".to_string(),
        range.end_arg(),
        "-o".to_string(),
        config.output_path().to_string_lossy().into_owned(),
        url.to_string(),
    ];

    let mut handle = spawner.spawn(&args).await?;
    let mut lines = LineAssembler::new();

    while let Some(event) = handle.recv().await {
        match event {
            ProcessEvent::Stdout(bytes) => {
                for line in lines.push(&bytes) {
                    if let Some(record) = progress::parse_line(&line, range) {
                        let _ = tx.send(DownloadEvent::Progress(record));
                    }
                }
            }
            ProcessEvent::Stderr(bytes) => return Err(Error::stderr(bytes)),
            ProcessEvent::Exited(code) => {
                if let Some(line) = lines.finish()
                    && let Some(record) = progress::parse_line(&line, range)
                {
                    let _ = tx.send(DownloadEvent::Progress(record));
                }
                return exit_outcome(code);
            }
        }
    }

    Ok(())
}
