//! End-to-end tests against a fake yt-dlp shell script.
//!
//! These exercise the real process spawner (spawn, stream, exit mapping)
//! rather than a scripted stand-in, so they are Unix-only.

#![cfg(unix)]

mod common;

use common::{fake_tool, fake_tool_failing_at};
use playlist_dl::{Config, DownloadEvent, PlaylistDownloader};
use tempfile::TempDir;

const URL: &str = "https://www.youtube.com/playlist?list=PLfake";

fn downloader_for(executable: std::path::PathBuf, dir: &TempDir) -> PlaylistDownloader {
    let config = Config {
        executable: Some(executable),
        download_dir: dir.path().join("downloads"),
        ..Config::default()
    };
    PlaylistDownloader::new(config).expect("construct downloader")
}

#[tokio::test]
async fn count_probe_resolves_against_real_process() {
    let dir = TempDir::new().expect("tempdir");
    let downloader = downloader_for(fake_tool(&dir, 8), &dir);

    let count = downloader.playlist_count(URL).await.expect("count");
    assert_eq!(count, 8);
}

#[tokio::test]
async fn details_returns_every_record_in_playlist_order() {
    let dir = TempDir::new().expect("tempdir");
    let downloader = downloader_for(fake_tool(&dir, 8), &dir);

    let details = downloader.details_and_wait(URL).await.expect("details");

    assert_eq!(details.len(), 8);
    for (i, record) in details.iter().enumerate() {
        let index = i as u64 + 1;
        assert_eq!(record.id, format!("item{index}"));
        assert_eq!(record.playlist_index, Some(index));
    }
}

#[tokio::test]
async fn download_emits_progress_and_completes() {
    let dir = TempDir::new().expect("tempdir");
    let downloader = downloader_for(fake_tool(&dir, 3), &dir);

    let mut handle = downloader.download(URL);
    let mut progress_items = Vec::new();
    let mut terminal = None;
    while let Some(event) = handle.recv().await {
        match event {
            DownloadEvent::Progress(p) => progress_items.push(p.start_index),
            other => terminal = Some(other),
        }
    }

    assert!(matches!(terminal, Some(DownloadEvent::Completed)));
    // Two progress lines per item, every item covered.
    for index in 1..=3 {
        assert_eq!(progress_items.iter().filter(|i| **i == index).count(), 2);
    }
}

#[tokio::test]
async fn failing_item_reports_task_failure_and_terminal_failed() {
    let dir = TempDir::new().expect("tempdir");
    let downloader = downloader_for(fake_tool_failing_at(&dir, 3, 2), &dir);

    let mut handle = downloader.download(URL);
    let mut task_failures = Vec::new();
    let mut completed_items = std::collections::HashSet::new();
    let mut terminal = None;
    while let Some(event) = handle.recv().await {
        match event {
            DownloadEvent::Progress(p) => {
                completed_items.insert(p.start_index);
            }
            DownloadEvent::TaskFailed { range, data, .. } => {
                let stderr = data.expect("stderr bytes");
                assert!(String::from_utf8_lossy(&stderr).contains("unable to fetch item 2"));
                task_failures.push(range.start);
            }
            other => terminal = Some(other),
        }
    }

    assert_eq!(task_failures, vec![2]);
    // Siblings of the failing item still ran to completion.
    assert!(completed_items.contains(&1));
    assert!(completed_items.contains(&3));
    assert!(matches!(terminal, Some(DownloadEvent::Failed { .. })));
}

#[tokio::test]
async fn failing_chunk_discards_details_results() {
    let dir = TempDir::new().expect("tempdir");
    let downloader = downloader_for(fake_tool_failing_at(&dir, 8, 6), &dir);

    let err = downloader.details_and_wait(URL).await.expect_err("failure");
    let stderr = err.data().expect("stderr bytes");
    assert!(String::from_utf8_lossy(stderr).contains("unable to fetch item 6"));
}

#[tokio::test]
async fn missing_executable_surfaces_as_spawn_failure() {
    let dir = TempDir::new().expect("tempdir");
    let config = Config {
        executable: Some(dir.path().join("definitely-not-here")),
        ..Config::default()
    };
    let downloader = PlaylistDownloader::new(config).expect("explicit paths are not probed");

    let err = downloader.playlist_count(URL).await.expect_err("spawn failure");
    assert!(err.to_string().contains("failed to spawn"));
}
