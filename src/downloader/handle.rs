//! Per-orchestration event handles
//!
//! Each top-level call returns one handle. Events arrive losslessly and in
//! emission order; the stream ends with exactly one terminal event.
//! Dropping a handle abandons the stream without stopping the external
//! processes the orchestration already started.

use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::types::{DetailsEvent, DownloadEvent, ItemDetails};

/// Event-bearing handle for one download orchestration
pub struct DownloadHandle {
    events: mpsc::UnboundedReceiver<DownloadEvent>,
}

impl DownloadHandle {
    pub(crate) fn new(events: mpsc::UnboundedReceiver<DownloadEvent>) -> Self {
        Self { events }
    }

    /// Next event, or `None` once the terminal event has been consumed.
    pub async fn recv(&mut self) -> Option<DownloadEvent> {
        self.events.recv().await
    }

    /// Drain events until the terminal one and convert it to a `Result`.
    ///
    /// Progress and per-task failure events are discarded; callers that
    /// want them should loop over [`DownloadHandle::recv`] instead.
    ///
    /// # Errors
    ///
    /// Returns the terminal failure when the orchestration failed.
    pub async fn wait(mut self) -> Result<()> {
        while let Some(event) = self.recv().await {
            match event {
                DownloadEvent::Completed => return Ok(()),
                DownloadEvent::Failed { message, data } => {
                    return Err(Error::Process { message, data });
                }
                _ => {}
            }
        }
        Err(orchestration_vanished())
    }
}

/// Event-bearing handle for one details orchestration
pub struct DetailsHandle {
    events: mpsc::UnboundedReceiver<DetailsEvent>,
}

impl DetailsHandle {
    pub(crate) fn new(events: mpsc::UnboundedReceiver<DetailsEvent>) -> Self {
        Self { events }
    }

    /// Next event, or `None` once the terminal event has been consumed.
    pub async fn recv(&mut self) -> Option<DetailsEvent> {
        self.events.recv().await
    }

    /// Drain events until the terminal one and convert it to a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the terminal failure when the orchestration failed.
    pub async fn wait(mut self) -> Result<Vec<ItemDetails>> {
        while let Some(event) = self.recv().await {
            match event {
                DetailsEvent::Completed(details) => return Ok(details),
                DetailsEvent::Failed { message, data } => {
                    return Err(Error::Process { message, data });
                }
                DetailsEvent::TaskFailed { .. } => {}
            }
        }
        Err(orchestration_vanished())
    }
}

/// The orchestration task ended without emitting a terminal event.
///
/// Only reachable if the driving task panicked; surfaced as a process
/// failure rather than a panic of the caller.
fn orchestration_vanished() -> Error {
    Error::Process {
        message: "orchestration ended without a terminal event".to_string(),
        data: None,
    }
}
