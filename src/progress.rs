//! Stateless parser for yt-dlp `[download]` progress lines
//!
//! Best-effort scrape of a tool that was never designed as a structured
//! protocol: lines that match the fixed pattern become
//! [`DownloadProgress`] records, everything else is silently ignored.
//! Format drift in the external tool degrades to "no progress events",
//! never to a hard failure.

use std::sync::OnceLock;

use regex::Regex;

use crate::chunk::ChunkRange;
use crate::types::DownloadProgress;
use crate::utils::parse_size;

/// Pattern: `[download]  45.2% of 120.5MiB at 3.1MiB/s ETA 00:32`
const PROGRESS_PATTERN: &str = r"^\[download\]\s*([0-9]+\.?[0-9]*)%\s*of\s*([0-9]+\.?[0-9]*)([a-zA-Z]+)\s*at\s*([0-9]+\.?[0-9]*)([a-zA-Z]+)/s\s*ETA\s*([0-9]+:?[0-9]*)$";

fn progress_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Fixed pattern, compiles unless the source literal is broken.
    RE.get_or_init(|| match Regex::new(PROGRESS_PATTERN) {
        Ok(re) => re,
        Err(e) => unreachable!("invalid progress pattern: {e}"),
    })
}

/// Parse one output line into a progress record.
///
/// Pure function: the same line always yields the same record. Returns
/// `None` for the many informational lines the tool emits, and for
/// matched lines whose magnitudes fail unit conversion.
pub fn parse_line(line: &str, range: ChunkRange) -> Option<DownloadProgress> {
    let caps = progress_regex().captures(line.trim())?;

    let percent: f64 = caps[1].parse().ok()?;
    let bytes_total = parse_size(&format!("{}{}", &caps[2], &caps[3]))?;
    let bytes_per_second = parse_size(&format!("{}{}", &caps[4], &caps[5]))?;
    let eta = caps[6].to_string();

    Some(DownloadProgress {
        start_index: range.start,
        end_index: range.end_index(),
        percent,
        bytes_current: (bytes_total as f64 * percent / 100.0) as u64,
        bytes_total,
        bytes_per_second,
        eta,
    })
}
