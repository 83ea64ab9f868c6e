//! Configuration types for playlist-dl

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Library configuration
///
/// Works out of the box: every field has a sensible default, and the
/// executable is discovered on PATH when no explicit path is given.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Explicit path to the yt-dlp executable (None = discover via PATH)
    #[serde(default)]
    pub executable: Option<PathBuf>,

    /// Directory downloaded files are written into (default: "./downloads")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// yt-dlp output template appended to `download_dir`
    /// (default: `%(title)s.%(ext)s`)
    #[serde(default = "default_output_template")]
    pub output_template: String,

    /// Maximum concurrent download processes (default: 1)
    ///
    /// Each playlist item is downloaded by its own process invocation;
    /// this bounds how many of those are alive at once.
    #[serde(default = "default_download_concurrency")]
    pub download_concurrency: usize,

    /// Maximum concurrent detail-dump processes (default: 5)
    #[serde(default = "default_details_concurrency")]
    pub details_concurrency: usize,

    /// Playlist items covered by one detail-dump invocation (default: 5)
    #[serde(default = "default_details_chunk_size")]
    pub details_chunk_size: u64,

    /// Media format selection and embedding options
    #[serde(default)]
    pub format: FormatConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            executable: None,
            download_dir: default_download_dir(),
            output_template: default_output_template(),
            download_concurrency: default_download_concurrency(),
            details_concurrency: default_details_concurrency(),
            details_chunk_size: default_details_chunk_size(),
            format: FormatConfig::default(),
        }
    }
}

impl Config {
    /// Baseline arguments passed to every yt-dlp invocation.
    ///
    /// Selects a capped video quality, forces the output container, and
    /// embeds subtitles/thumbnail/chapters/metadata per the format config.
    pub fn base_args(&self) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            format!("bv[height<={}]+ba", self.format.max_height),
            "--merge-output-format".to_string(),
            self.format.merge_output_format.clone(),
        ];
        if self.format.embed_subs {
            args.push("--embed-subs".to_string());
        }
        if self.format.embed_thumbnail {
            args.push("--embed-thumbnail".to_string());
        }
        if self.format.embed_chapters {
            args.push("--embed-chapters".to_string());
        }
        if self.format.embed_metadata {
            args.push("--embed-metadata".to_string());
        }
        args
    }

    /// Output-path directive handed to yt-dlp's `-o` flag.
    pub fn output_path(&self) -> PathBuf {
        self.download_dir.join(&self.output_template)
    }
}

/// Media format selection and embedding options
///
/// Controls the fixed argument prefix shared by all invocations.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Maximum video height in pixels (default: 1080)
    #[serde(default = "default_max_height")]
    pub max_height: u32,

    /// Container the merged output is forced into (default: "mp4")
    #[serde(default = "default_merge_format")]
    pub merge_output_format: String,

    /// Embed subtitles into the output file (default: true)
    #[serde(default = "default_true")]
    pub embed_subs: bool,

    /// Embed the thumbnail into the output file (default: true)
    #[serde(default = "default_true")]
    pub embed_thumbnail: bool,

    /// Embed chapter markers into the output file (default: true)
    #[serde(default = "default_true")]
    pub embed_chapters: bool,

    /// Embed metadata into the output file (default: true)
    #[serde(default = "default_true")]
    pub embed_metadata: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            max_height: default_max_height(),
            merge_output_format: default_merge_format(),
            embed_subs: true,
            embed_thumbnail: true,
            embed_chapters: true,
            embed_metadata: true,
        }
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_output_template() -> String {
    "%(title)s.%(ext)s".to_string()
}

fn default_download_concurrency() -> usize {
    1
}

fn default_details_concurrency() -> usize {
    5
}

fn default_details_chunk_size() -> u64 {
    5
}

fn default_max_height() -> u32 {
    1080
}

fn default_merge_format() -> String {
    "mp4".to_string()
}

fn default_true() -> bool {
    true
}
