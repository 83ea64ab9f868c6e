//! # playlist-dl
//!
//! Async orchestration library for downloading playlists with the `yt-dlp`
//! command-line tool.
//!
//! ## Design Philosophy
//!
//! playlist-dl is designed to be:
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Event-driven** - Consumers receive structured events, no polling or
//!   output scraping required
//! - **Concurrency-bounded** - Playlists are split into index ranges and
//!   processed by a bounded task queue
//! - **Tolerant of partial failure** - A failing range never cancels its
//!   siblings; the orchestration reports every failure and a single
//!   terminal outcome
//!
//! ## Quick Start
//!
//! ```no_run
//! use playlist_dl::{Config, DownloadEvent, PlaylistDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Locates yt-dlp on PATH; see Config::executable to pin a path.
//!     let downloader = PlaylistDownloader::new(Config::default())?;
//!
//!     let mut handle = downloader.download("https://www.youtube.com/playlist?list=PL...");
//!     while let Some(event) = handle.recv().await {
//!         match event {
//!             DownloadEvent::Progress(p) => {
//!                 println!("item {}: {:.1}%", p.start_index, p.percent);
//!             }
//!             DownloadEvent::TaskFailed { range, message, .. } => {
//!                 eprintln!("{range} failed: {message}");
//!             }
//!             DownloadEvent::Completed => println!("done"),
//!             DownloadEvent::Failed { message, .. } => eprintln!("failed: {message}"),
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Chunk planning over playlist index ranges
pub mod chunk;
/// Configuration types
pub mod config;
/// Core downloader implementation (decomposed into focused submodules)
pub mod downloader;
/// Error types
pub mod error;
pub(crate) mod process;
/// Progress line parsing
pub mod progress;
pub(crate) mod queue;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use chunk::{ChunkEnd, ChunkRange};
pub use config::{Config, FormatConfig};
pub use downloader::{DetailsHandle, DownloadHandle, PlaylistDownloader};
pub use error::{Error, Result};
pub use types::{DetailsEvent, DownloadEvent, DownloadProgress, ItemDetails};
