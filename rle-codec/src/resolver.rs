//! Row resolver: logical row index to per-column line offsets.
//!
//! A cold lookup walks forward from the nearest index checkpoint. When rows
//! are requested in increasing order (a downward pan, or consecutive device
//! rows of one frame) the previous walk usually ended just before the next
//! request, so the resolver resumes from that [`ScanHint`] instead.

use crate::index::SparseLineIndex;
use crate::row_cache::{RowCache, RowOffsets, ROW_CACHE_CAPACITY};
use crate::scanner::LineWalker;
use tracing::trace;

/// Where the most recent forward walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanHint {
    /// Index of the next unscanned line.
    pub line: usize,
    /// Byte offset of that line.
    pub offset: usize,
}

/// Lookup counters, reset on demand.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolverStats {
    pub hits: u64,
    pub misses: u64,
    /// Misses that resumed from the scan hint.
    pub hinted: u64,
    /// Lines stepped over by forward walks.
    pub lines_scanned: u64,
}

impl ResolverStats {
    /// Fraction of lookups served from the row cache.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Resolves logical rows through the row cache, scan hint and sparse index.
#[derive(Debug, Clone)]
pub struct RowResolver {
    cols: usize,
    cache: RowCache,
    hint: Option<ScanHint>,
    stats: ResolverStats,
}

impl RowResolver {
    /// Create a resolver for a grid `cols` tiles wide.
    pub fn new(cols: usize) -> Self {
        Self::with_capacity(cols, ROW_CACHE_CAPACITY)
    }

    /// Create a resolver with a custom row cache size.
    pub fn with_capacity(cols: usize, capacity: usize) -> Self {
        Self {
            cols,
            cache: RowCache::new(capacity),
            hint: None,
            stats: ResolverStats::default(),
        }
    }

    /// Tile columns per row.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Current scan hint, if any.
    pub fn hint(&self) -> Option<ScanHint> {
        self.hint
    }

    /// Lookup counters since the last reset.
    pub fn stats(&self) -> ResolverStats {
        self.stats
    }

    /// Return and clear the lookup counters.
    pub fn take_stats(&mut self) -> ResolverStats {
        std::mem::take(&mut self.stats)
    }

    /// Drop cached rows and the scan hint.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.hint = None;
    }

    /// Offsets of the `cols` lines that make up row `y`.
    pub fn resolve_row(&mut self, data: &[u8], index: &SparseLineIndex, y: usize) -> RowOffsets {
        if let Some(offsets) = self.cache.get(y) {
            self.stats.hits += 1;
            trace!("Row cache hit for row {}", y);
            return offsets.clone();
        }

        self.stats.misses += 1;
        let offsets = self.scan_row(data, index, y);
        if let Some(evicted) = self.cache.insert(y, offsets.clone()) {
            trace!("Row {} evicted for row {}", evicted, y);
        }
        offsets
    }

    /// Checkpoint to start walking from for line `target`.
    fn start_point(&mut self, index: &SparseLineIndex, target: usize) -> (usize, usize) {
        let (floor, sample_offset) = index.checkpoint_for(target);
        match self.hint {
            Some(hint) if hint.line >= floor && hint.line <= target => {
                self.stats.hinted += 1;
                (hint.line, hint.offset)
            }
            _ => (floor, sample_offset),
        }
    }

    fn scan_row(&mut self, data: &[u8], index: &SparseLineIndex, y: usize) -> RowOffsets {
        let mut offsets: RowOffsets = vec![None; self.cols];
        let first = y.saturating_mul(self.cols);
        if first >= index.line_count() {
            return offsets;
        }

        let (start_line, start_offset) = self.start_point(index, first);
        let mut walker =
            LineWalker::new(data, start_line, start_offset).with_limit(index.line_count());

        let reached = walker.advance_to(first).is_some();
        if reached {
            for slot in offsets.iter_mut() {
                match walker.next() {
                    Some(line) => *slot = Some(line.offset),
                    None => break,
                }
            }
        }

        let (next_line, next_offset) = walker.position();
        self.stats.lines_scanned += (next_line - start_line) as u64;

        self.hint = if reached && offsets.iter().all(Option::is_some) {
            Some(ScanHint {
                line: next_line,
                offset: next_offset,
            })
        } else {
            trace!("Row {} incomplete, dropping scan hint", y);
            None
        };
        offsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stream of `count` lines, line `i` being 20 or 40 bytes long.
    fn stream(count: usize) -> Vec<u8> {
        let mut data = Vec::new();
        for i in 0..count {
            if i % 2 == 0 {
                data.extend(std::iter::repeat(0xF5).take(20));
            } else {
                data.extend(std::iter::repeat(0x7A).take(40));
            }
        }
        data
    }

    #[test]
    fn test_resolve_matches_index() {
        let data = stream(4 * 300);
        let index = SparseLineIndex::build(&data).unwrap();
        let mut resolver = RowResolver::new(4);
        for y in [0, 1, 2, 17, 16, 250, 299, 5] {
            let offsets = resolver.resolve_row(&data, &index, y);
            let expected: RowOffsets = (0..4).map(|c| index.offset_of(&data, y * 4 + c)).collect();
            assert_eq!(offsets, expected, "row {y}");
        }
    }

    #[test]
    fn test_cache_hit_is_identical() {
        let data = stream(4 * 100);
        let index = SparseLineIndex::build(&data).unwrap();
        let mut resolver = RowResolver::new(4);
        let cold = resolver.resolve_row(&data, &index, 42);
        let warm = resolver.resolve_row(&data, &index, 42);
        assert_eq!(cold, warm);
        let stats = resolver.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[test]
    fn test_sequential_rows_use_hint() {
        let data = stream(2 * 200);
        let index = SparseLineIndex::build(&data).unwrap();
        let mut resolver = RowResolver::new(2);

        resolver.resolve_row(&data, &index, 10);
        assert_eq!(resolver.hint(), index.offset_of(&data, 22).map(|offset| ScanHint { line: 22, offset }));

        resolver.resolve_row(&data, &index, 11);
        let stats = resolver.take_stats();
        assert_eq!(stats.hinted, 1);
        // Second row only walked its own two lines.
        assert_eq!(stats.lines_scanned, 22 + 2);
    }

    #[test]
    fn test_backward_request_falls_back_to_sample() {
        let data = stream(2 * 200);
        let index = SparseLineIndex::build(&data).unwrap();
        let mut resolver = RowResolver::new(2);
        resolver.resolve_row(&data, &index, 100);
        resolver.take_stats();

        let offsets = resolver.resolve_row(&data, &index, 40);
        assert_eq!(offsets, vec![index.offset_of(&data, 80), index.offset_of(&data, 81)]);
        assert_eq!(resolver.stats().hinted, 0);
    }

    #[test]
    fn test_truncated_tail_marks_missing() {
        let mut data = stream(7);
        let index = SparseLineIndex::build(&data).unwrap();
        // Grow the buffer after indexing: lines past the index never resolve.
        data.extend(stream(3));
        let mut resolver = RowResolver::new(4);

        let offsets = resolver.resolve_row(&data, &index, 1);
        assert_eq!(offsets[0], index.offset_of(&data, 4));
        assert_eq!(offsets[2], index.offset_of(&data, 6));
        assert_eq!(offsets[3], None);
        assert_eq!(resolver.hint(), None);

        assert_eq!(resolver.resolve_row(&data, &index, 5), vec![None; 4]);
    }
}
