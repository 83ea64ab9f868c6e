//! Utility helpers: unit-suffixed size parsing and raw-chunk line assembly

/// Parse a unit-suffixed size string (e.g. `"120.5MiB"`) into bytes.
///
/// Binary unit markers are stripped before conversion (`MiB` and `MB` are
/// equivalent), and magnitudes use 1024-based multipliers. Returns `None`
/// for strings without a valid magnitude or with an unknown unit.
///
/// # Examples
///
/// ```
/// use playlist_dl::utils::parse_size;
///
/// assert_eq!(parse_size("1KiB"), Some(1024));
/// assert_eq!(parse_size("120.5MiB"), Some(126_353_408));
/// assert_eq!(parse_size("42"), Some(42));
/// assert_eq!(parse_size("fast"), None);
/// ```
pub fn parse_size(s: &str) -> Option<u64> {
    let s = s.trim();
    let split = s
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(s.len());
    let (magnitude, unit) = s.split_at(split);

    let value: f64 = magnitude.parse().ok()?;

    // Strip the binary marker: "MiB" and "MB" scale identically.
    let unit: String = unit
        .chars()
        .filter(|c| *c != 'i' && *c != 'I')
        .collect::<String>()
        .to_lowercase();

    let multiplier: u64 = match unit.as_str() {
        "" | "b" => 1,
        "kb" | "k" => 1 << 10,
        "mb" | "m" => 1 << 20,
        "gb" | "g" => 1 << 30,
        "tb" | "t" => 1 << 40,
        "pb" | "p" => 1 << 50,
        _ => return None,
    };

    if value < 0.0 {
        return None;
    }

    Some((value * multiplier as f64) as u64)
}

/// Assembles complete lines out of raw output chunks.
///
/// The process runner delivers stdout as it arrives, with no line-buffering
/// guarantee; a progress line may be split across two chunks. This keeps the
/// trailing partial line buffered until its terminator shows up. Handles
/// `\n`, `\r\n`, and lone `\r` terminators (yt-dlp rewrites progress lines
/// with bare carriage returns).
#[derive(Debug, Default)]
pub(crate) struct LineAssembler {
    carry: Vec<u8>,
}

impl LineAssembler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feed one raw chunk; returns every line completed by it.
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.carry.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        let mut i = 0;
        while i < self.carry.len() {
            match self.carry[i] {
                b'\n' => {
                    lines.push(String::from_utf8_lossy(&self.carry[start..i]).into_owned());
                    i += 1;
                    start = i;
                }
                b'\r' => {
                    // A trailing \r might be half of a \r\n split across chunks.
                    if i + 1 == self.carry.len() {
                        break;
                    }
                    lines.push(String::from_utf8_lossy(&self.carry[start..i]).into_owned());
                    i += if self.carry[i + 1] == b'\n' { 2 } else { 1 };
                    start = i;
                }
                _ => i += 1,
            }
        }
        self.carry.drain(..start);
        lines
    }

    /// Flush the remaining partial line, if any.
    pub(crate) fn finish(&mut self) -> Option<String> {
        if self.carry.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.carry).into_owned();
        self.carry.clear();
        let trimmed = line.trim_end_matches('\r').to_string();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    }
}
