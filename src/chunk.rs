//! Chunk planning — splitting a playlist into bounded, contiguous index ranges
//!
//! Pure and deterministic: no I/O, no async. The orchestrators turn each
//! planned range into one external process invocation.

use serde::{Deserialize, Serialize};

/// Upper bound of a [`ChunkRange`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChunkEnd {
    /// Concrete 1-based playlist index (inclusive)
    Index(u64),
    /// Open upper bound, deferred to the external tool's `"last"` sentinel
    Last,
}

impl std::fmt::Display for ChunkEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Last => write!(f, "last"),
        }
    }
}

/// A contiguous sub-range of 1-based playlist indices handled by one task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkRange {
    /// First index covered (1-based, inclusive)
    pub start: u64,
    /// Last index covered (inclusive), or open
    pub end: ChunkEnd,
}

impl ChunkRange {
    /// Range covering a single playlist item.
    pub fn single(index: u64) -> Self {
        Self {
            start: index,
            end: ChunkEnd::Index(index),
        }
    }

    /// The concrete end index this range reports in events.
    ///
    /// Open ranges report their start, since the true bound is only known
    /// to the external tool.
    pub fn end_index(&self) -> u64 {
        match self.end {
            ChunkEnd::Index(i) => i,
            ChunkEnd::Last => self.start,
        }
    }

    /// The `--playlist-end` argument value for this range.
    pub fn end_arg(&self) -> String {
        self.end.to_string()
    }
}

impl std::fmt::Display for ChunkRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Plan disjoint, contiguous ranges covering `[1, total]`.
///
/// Emits `ceil(total / chunk_size)` ranges. The last range's end becomes
/// [`ChunkEnd::Last`] when its concrete bound would exceed `total`,
/// deferring the upper bound to the external tool. A `total` of zero
/// (unknown collection size) yields a single open range.
///
/// `chunk_size` must be at least 1; zero is treated as 1.
pub fn plan(total: u64, chunk_size: u64) -> Vec<ChunkRange> {
    let chunk_size = chunk_size.max(1);

    if total == 0 {
        return vec![ChunkRange {
            start: 1,
            end: ChunkEnd::Last,
        }];
    }

    let mut ranges = Vec::with_capacity(total.div_ceil(chunk_size) as usize);
    let mut start = 1;
    while start <= total {
        let end = start + chunk_size - 1;
        ranges.push(ChunkRange {
            start,
            end: if end > total {
                ChunkEnd::Last
            } else {
                ChunkEnd::Index(end)
            },
        });
        start = end + 1;
    }
    ranges
}

/// Plan one singleton range per item — the download path's layout.
pub fn plan_singletons(total: u64) -> Vec<ChunkRange> {
    (1..=total.max(1)).map(ChunkRange::single).collect()
}
