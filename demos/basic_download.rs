//! Basic download example
//!
//! This example demonstrates the core functionality of playlist-dl:
//! - Creating a downloader instance
//! - Starting a playlist download
//! - Monitoring progress and failure events

use playlist_dl::{Config, DownloadEvent, PlaylistDownloader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://www.youtube.com/playlist?list=PL...".to_string());

    // Build configuration
    let config = Config {
        download_dir: "downloads".into(),
        download_concurrency: 1,
        ..Default::default()
    };

    // Create downloader instance (locates yt-dlp on PATH)
    let downloader = PlaylistDownloader::new(config)?;

    println!("Downloading {url}");
    let mut handle = downloader.download(&url);

    // Drain events until the terminal one
    while let Some(event) = handle.recv().await {
        match event {
            DownloadEvent::Progress(p) => {
                println!(
                    "  item {}: {:>5.1}% ({} / {} bytes, {} B/s, ETA {})",
                    p.start_index, p.percent, p.bytes_current, p.bytes_total, p.bytes_per_second, p.eta
                );
            }
            DownloadEvent::TaskFailed { range, message, .. } => {
                eprintln!("  item range {range} failed: {message}");
            }
            DownloadEvent::Completed => {
                println!("Download complete");
            }
            DownloadEvent::Failed { message, .. } => {
                eprintln!("Download failed: {message}");
            }
        }
    }

    Ok(())
}
