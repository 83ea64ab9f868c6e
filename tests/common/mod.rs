//! Shared fixtures: a fake yt-dlp shell script for end-to-end tests.

#![allow(dead_code)]
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use tempfile::TempDir;

/// Script template. Speaks just enough of the real tool's argument and
/// output conventions for the orchestrators: the count probe (`-O`),
/// chunked `--dump-json` record dumps, and `[download]` progress lines.
/// A start index equal to `__FAIL__` fails with stderr and exit 2.
const SCRIPT: &str = r#"#!/bin/sh
count=__COUNT__
fail=__FAIL__
start=1
end=$count
mode=download
prev=""
for arg in "$@"; do
  case "$prev" in
    --playlist-start) start=$arg ;;
    --playlist-end) end=$arg ;;
  esac
  case "$arg" in
    -O) mode=probe ;;
    --dump-json) mode=dump ;;
  esac
  prev=$arg
done
[ "$end" = "last" ] && end=$count

if [ "$mode" != "probe" ] && [ "$start" = "$fail" ]; then
  echo "ERROR: unable to fetch item $start" >&2
  exit 2
fi

case "$mode" in
  probe)
    echo "$count"
    ;;
  dump)
    i=$start
    while [ "$i" -le "$end" ]; do
      printf '{"id": "item%s", "title": "Item %s", "playlist_index": %s}\n' "$i" "$i" "$i"
      i=$((i+1))
    done
    ;;
  download)
    echo "[youtube] item$start: Downloading webpage"
    echo "[download]  50.0% of 10.0MiB at 2.0MiB/s ETA 00:05"
    echo "[download] 100% of 10.0MiB at 2.0MiB/s ETA 00"
    ;;
esac
exit 0
"#;

/// Write an executable fake tool reporting `count` items, with no failures.
pub fn fake_tool(dir: &TempDir, count: u64) -> PathBuf {
    fake_tool_failing_at(dir, count, 0)
}

/// Write an executable fake tool that fails any task starting at
/// `fail_start` (0 disables the failure).
pub fn fake_tool_failing_at(dir: &TempDir, count: u64, fail_start: u64) -> PathBuf {
    let path = dir.path().join("yt-dlp");
    let body = SCRIPT
        .replace("__COUNT__", &count.to_string())
        .replace("__FAIL__", &fail_start.to_string());
    fs::write(&path, body).expect("write fake tool");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod fake tool");
    path
}
