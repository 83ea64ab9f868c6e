//! Details orchestration — chunked structured dumps of playlist items
//!
//! Count probe → fixed-width chunk plan → bounded task queue → per-chunk
//! simulate + dump-json invocation. Each stdout line parses as one
//! structured item record; a malformed line aborts that chunk's task. The
//! per-chunk record vectors are merged once, after every task has settled,
//! so no accumulator is ever shared between running tasks.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::PlaylistDownloader;
use super::download::{FirstError, record_first};
use super::handle::DetailsHandle;
use crate::chunk::{self, ChunkRange};
use crate::error::{Error, Result};
use crate::process::{ProcessEvent, SharedSpawner, exit_outcome};
use crate::queue::TaskQueue;
use crate::types::{DetailsEvent, ItemDetails};
use crate::utils::LineAssembler;

impl PlaylistDownloader {
    /// Retrieve one structured record per item of the collection behind
    /// `url`.
    ///
    /// Returns immediately with an event-bearing handle; the orchestration
    /// runs on a detached task. Details orchestrations emit no progress
    /// events — only task failures and the terminal event, whose
    /// `Completed` payload is the accumulated record sequence.
    pub fn details(&self, url: &str) -> DetailsHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let this = self.clone();
        let url = url.to_string();
        tokio::spawn(async move { this.run_details(url, tx).await });
        DetailsHandle::new(rx)
    }

    /// Retrieve all item records and wait for the terminal event.
    ///
    /// # Errors
    ///
    /// Returns the terminal failure when any chunk task failed; partial
    /// results from succeeding chunks are discarded in that case.
    pub async fn details_and_wait(&self, url: &str) -> Result<Vec<ItemDetails>> {
        self.details(url).wait().await
    }

    async fn run_details(self, url: String, tx: mpsc::UnboundedSender<DetailsEvent>) {
        let count = match self.playlist_count(&url).await {
            Ok(count) => count,
            Err(e) => {
                let data = e.data().map(<[u8]>::to_vec);
                let _ = tx.send(DetailsEvent::Failed {
                    message: e.to_string(),
                    data,
                });
                return;
            }
        };

        let ranges = chunk::plan(count, self.config.details_chunk_size);
        let first_error: FirstError = Default::default();
        let mut queue: TaskQueue<Vec<ItemDetails>> =
            TaskQueue::new(self.config.details_concurrency);

        for range in ranges {
            let spawner = Arc::clone(&self.spawner);
            let url = url.clone();
            let tx = tx.clone();
            let first_error = Arc::clone(&first_error);

            queue.push(async move {
                match run_chunk_task(&spawner, &url, range).await {
                    Ok(records) => records,
                    Err(e) => {
                        tracing::warn!(%range, error = %e, "details task failed");
                        let data = e.data().map(<[u8]>::to_vec);
                        record_first(&first_error, e.to_string(), data.clone());
                        let _ = tx.send(DetailsEvent::TaskFailed {
                            range,
                            message: e.to_string(),
                            data,
                        });
                        Vec::new()
                    }
                }
            });
        }

        tracing::debug!(%url, count, tasks = queue.len(), "planned details query");

        // Each task owns its record slot; slots are merged only here,
        // after the idle signal.
        let chunks = queue.run().await;

        let failure = first_error.lock().ok().and_then(|mut guard| guard.take());
        let _ = match failure {
            Some((message, data)) => tx.send(DetailsEvent::Failed { message, data }),
            None => {
                let details: Vec<ItemDetails> = chunks.into_iter().flatten().collect();
                tx.send(DetailsEvent::Completed(details))
            }
        };
    }
}

/// Run one chunk invocation and collect its structured records.
async fn run_chunk_task(
    spawner: &SharedSpawner,
    url: &str,
    range: ChunkRange,
) -> Result<Vec<ItemDetails>> {
    let args = vec![
        "--simulate".to_string(),
        "--dump-json".to_string(),
        "--playlist-start".to_string(),
        range.start.to_string(),
        "--playlist-end".to_string(),
        range.end_arg(),
        url.to_string(),
    ];

    let mut handle = spawner.spawn(&args).await?;
    let mut lines = LineAssembler::new();
    let mut records = Vec::new();

    while let Some(event) = handle.recv().await {
        match event {
            ProcessEvent::Stdout(bytes) => {
                for line in lines.push(&bytes) {
                    if let Some(record) = parse_record(&line)? {
                        records.push(record);
                    }
                }
            }
            ProcessEvent::Stderr(bytes) => return Err(Error::stderr(bytes)),
            ProcessEvent::Exited(code) => {
                if let Some(line) = lines.finish()
                    && let Some(record) = parse_record(&line)?
                {
                    records.push(record);
                }
                exit_outcome(code)?;
                return Ok(records);
            }
        }
    }

    Ok(records)
}

/// Parse one dump-json line; blank lines are skipped, malformed ones fail.
fn parse_record(line: &str) -> Result<Option<ItemDetails>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}
