//! Core types and per-orchestration events for playlist-dl

use serde::{Deserialize, Serialize};

use crate::chunk::ChunkRange;

/// Structured progress for one playlist item being downloaded
///
/// Derived from a single matched progress line; transient — emitted as an
/// event and never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DownloadProgress {
    /// First playlist index covered by the emitting task (1-based)
    pub start_index: u64,
    /// Last playlist index covered by the emitting task (1-based)
    pub end_index: u64,
    /// Progress percentage (0.0 to 100.0)
    pub percent: f64,
    /// Bytes downloaded so far (derived from percent of total)
    pub bytes_current: u64,
    /// Total size in bytes
    pub bytes_total: u64,
    /// Current speed in bytes per second
    pub bytes_per_second: u64,
    /// Estimated time remaining, as reported by the tool (e.g. "00:32")
    pub eta: String,
}

/// One structured record for a retrieved playlist item
///
/// Prominent fields are typed; everything else the tool dumps is preserved
/// in `extra`. The payload is treated as opaque beyond being a well-formed
/// JSON object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDetails {
    /// Item identifier
    #[serde(default)]
    pub id: String,
    /// Item title
    #[serde(default)]
    pub title: String,
    /// Uploader display name
    #[serde(default)]
    pub uploader: Option<String>,
    /// Channel display name
    #[serde(default)]
    pub channel: Option<String>,
    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
    /// Canonical page URL
    #[serde(default)]
    pub webpage_url: Option<String>,
    /// 1-based index of the item within its playlist
    #[serde(default)]
    pub playlist_index: Option<u64>,
    /// Total item count of the containing playlist, when known
    #[serde(default)]
    pub playlist_count: Option<u64>,
    /// Upload date in YYYYMMDD form
    #[serde(default)]
    pub upload_date: Option<String>,
    /// Remaining fields of the tool's JSON record, untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Events emitted by a download orchestration
///
/// Non-terminal events (`Progress`, `TaskFailed`) may arrive any number of
/// times and in any interleaving; exactly one terminal event (`Completed`
/// or `Failed`) ends the stream. `Completed` never fires once any task has
/// failed.
#[derive(Clone, Debug)]
pub enum DownloadEvent {
    /// Progress update for one in-flight item
    Progress(DownloadProgress),

    /// One per-item task failed; siblings keep running
    TaskFailed {
        /// Range the failing task was responsible for
        range: ChunkRange,
        /// Failure message
        message: String,
        /// Raw stderr bytes, when any were captured
        data: Option<Vec<u8>>,
    },

    /// Terminal: every item task succeeded
    Completed,

    /// Terminal: at least one task failed (carries the first observed error)
    Failed {
        /// Failure message
        message: String,
        /// Raw stderr bytes, when any were captured
        data: Option<Vec<u8>>,
    },
}

impl DownloadEvent {
    /// Whether this event ends the orchestration's stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed { .. })
    }
}

/// Events emitted by a details orchestration
///
/// Details orchestrations do not emit progress; the shape is otherwise the
/// same as [`DownloadEvent`], with `Completed` carrying the accumulated
/// record sequence. Per-chunk results are merged in chunk order once every
/// task has settled, so the sequence follows playlist order regardless of
/// which chunk finished first.
#[derive(Clone, Debug)]
pub enum DetailsEvent {
    /// One chunk task failed; siblings keep running
    TaskFailed {
        /// Range the failing task was responsible for
        range: ChunkRange,
        /// Failure message
        message: String,
        /// Raw stderr bytes, when any were captured
        data: Option<Vec<u8>>,
    },

    /// Terminal: all chunk tasks succeeded
    Completed(Vec<ItemDetails>),

    /// Terminal: at least one task failed (carries the first observed error)
    Failed {
        /// Failure message
        message: String,
        /// Raw stderr bytes, when any were captured
        data: Option<Vec<u8>>,
    },
}

impl DetailsEvent {
    /// Whether this event ends the orchestration's stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Failed { .. })
    }
}
