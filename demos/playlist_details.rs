//! Playlist details example
//!
//! Retrieves one structured record per playlist item without downloading
//! anything, then prints a short table.

use playlist_dl::{Config, PlaylistDownloader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://www.youtube.com/playlist?list=PL...".to_string());

    let downloader = PlaylistDownloader::new(Config::default())?;

    let count = downloader.playlist_count(&url).await?;
    println!("Playlist reports {count} item(s); fetching details...");

    // Blocks until every chunk task has settled
    let details = downloader.details_and_wait(&url).await?;

    for item in &details {
        let index = item
            .playlist_index
            .map_or_else(|| "?".to_string(), |i| i.to_string());
        let duration = item
            .duration
            .map_or_else(|| "--:--".to_string(), |d| format!("{:.0}s", d));
        println!("{index:>4}  {duration:>7}  {}", item.title);
    }

    Ok(())
}
