//! Line scanner for the 4-bit run-length line format.
//!
//! Every byte of the stream encodes one run:
//!
//! ```text
//!   7   6   5   4   3   2   1   0
//! +---------------+---------------+
//! | run length-1  | palette index |
//! +---------------+---------------+
//! ```
//!
//! Lines carry no delimiter. A line ends at the first byte whose run brings the
//! decoded width to [`LINE_WIDTH`] or beyond; pixels past the boundary are
//! dropped and never carried over to the next line. A line whose bytes run out
//! before reaching [`LINE_WIDTH`] is truncated and counts as absent.
//!
//! # Example
//!
//! ```
//! use rle_codec::scanner::{scan_line, LineWalker};
//!
//! // 20 runs of 16 pixels = one 320-pixel line.
//! let data = vec![0xF3u8; 40];
//! assert_eq!(scan_line(&data, 0), Some(20));
//!
//! let offsets: Vec<usize> = LineWalker::new(&data, 0, 0).map(|l| l.offset).collect();
//! assert_eq!(offsets, vec![0, 20]);
//! ```

use rle_common::LINE_WIDTH;

/// One decoded run: `len` pixels of palette entry `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub len: usize,
    pub index: u8,
}

impl Run {
    /// Split an encoded byte into its run length and palette index.
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            len: ((byte >> 4) & 0x0F) as usize + 1,
            index: byte & 0x0F,
        }
    }
}

/// Byte length of the line starting at `start`, or `None` if the buffer ends
/// before the line reaches [`LINE_WIDTH`] pixels.
pub fn scan_line(data: &[u8], start: usize) -> Option<usize> {
    let tail = data.get(start..)?;
    let mut pixels = 0usize;
    for (consumed, &byte) in tail.iter().enumerate() {
        pixels += Run::from_byte(byte).len;
        if pixels >= LINE_WIDTH {
            return Some(consumed + 1);
        }
    }
    None
}

/// Upper bound on the number of lines, from the total decoded pixel count.
pub fn estimate_line_count(data: &[u8]) -> usize {
    let pixels: usize = data.iter().map(|&b| Run::from_byte(b).len).sum();
    pixels / LINE_WIDTH
}

/// Byte extent of one logical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineExtent {
    pub index: usize,
    pub offset: usize,
    pub len: usize,
}

impl LineExtent {
    /// Offset of the first byte after this line.
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Forward cursor over consecutive lines, starting from a known checkpoint.
///
/// The walker yields each complete line in turn and stops at the first
/// truncated line or at the configured line limit.
#[derive(Debug, Clone)]
pub struct LineWalker<'a> {
    data: &'a [u8],
    next_index: usize,
    offset: usize,
    limit: usize,
}

impl<'a> LineWalker<'a> {
    /// Start walking at line `index`, which begins at byte `offset`.
    pub fn new(data: &'a [u8], index: usize, offset: usize) -> Self {
        Self {
            data,
            next_index: index,
            offset,
            limit: usize::MAX,
        }
    }

    /// Stop before line `limit` even if more bytes follow.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Index and byte offset of the next line the walker would yield.
    pub fn position(&self) -> (usize, usize) {
        (self.next_index, self.offset)
    }

    /// Skip forward until line `target` is next and return its offset.
    ///
    /// Fails if `target` lies behind the cursor, past the limit, or beyond a
    /// truncated line.
    pub fn advance_to(&mut self, target: usize) -> Option<usize> {
        if target < self.next_index || target >= self.limit {
            return None;
        }
        while self.next_index < target {
            self.next()?;
        }
        Some(self.offset)
    }
}

impl Iterator for LineWalker<'_> {
    type Item = LineExtent;

    fn next(&mut self) -> Option<LineExtent> {
        if self.next_index >= self.limit {
            return None;
        }
        let len = scan_line(self.data, self.offset)?;
        let extent = LineExtent {
            index: self.next_index,
            offset: self.offset,
            len,
        };
        self.next_index += 1;
        self.offset += len;
        Some(extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Byte encoding `len` pixels of palette entry `index`.
    fn run(len: usize, index: u8) -> u8 {
        (((len - 1) as u8) << 4) | (index & 0x0F)
    }

    #[test]
    fn test_run_from_byte() {
        assert_eq!(Run::from_byte(0x0F), Run { len: 1, index: 15 });
        assert_eq!(Run::from_byte(0xF0), Run { len: 16, index: 0 });
        assert_eq!(Run::from_byte(0x73), Run { len: 8, index: 3 });
    }

    #[test]
    fn test_exact_line() {
        let data = vec![run(16, 1); 20];
        assert_eq!(scan_line(&data, 0), Some(20));
    }

    #[test]
    fn test_overshoot_ends_line() {
        // 304 + 1 + 16 = 321 pixels; the extra pixel is dropped.
        let mut data = vec![run(16, 1); 19];
        data.push(run(1, 2));
        data.push(run(16, 3));
        data.push(run(16, 4));
        assert_eq!(scan_line(&data, 0), Some(21));
        // The next line starts right after the overshooting byte.
        assert_eq!(scan_line(&data, 21), None);
    }

    #[test]
    fn test_truncated_line_is_absent() {
        // 300 of 320 pixels.
        let mut data = vec![run(16, 0); 18];
        data.push(run(12, 0));
        assert_eq!(scan_line(&data, 0), None);
    }

    #[test]
    fn test_start_past_end() {
        let data = vec![run(16, 0); 20];
        assert_eq!(scan_line(&data, 20), None);
        assert_eq!(scan_line(&data, 100), None);
        assert_eq!(scan_line(&[], 0), None);
    }

    #[test]
    fn test_scan_is_idempotent() {
        let data: Vec<u8> = (0..200u16).map(|i| (i * 37 % 256) as u8).collect();
        for start in 0..data.len() {
            assert_eq!(scan_line(&data, start), scan_line(&data, start));
        }
    }

    #[test]
    fn test_estimate_line_count() {
        assert_eq!(estimate_line_count(&[]), 0);
        assert_eq!(estimate_line_count(&vec![run(16, 0); 40]), 2);
        assert_eq!(estimate_line_count(&vec![run(16, 0); 39]), 1);
    }

    #[test]
    fn test_walker_yields_extents() {
        let mut data = vec![run(16, 0); 20];
        data.extend(vec![run(8, 1); 40]);
        data.extend(vec![run(16, 2); 5]);

        let lines: Vec<LineExtent> = LineWalker::new(&data, 0, 0).collect();
        assert_eq!(
            lines,
            vec![
                LineExtent { index: 0, offset: 0, len: 20 },
                LineExtent { index: 1, offset: 20, len: 40 },
            ]
        );
        assert_eq!(lines[1].end(), 60);
    }

    #[test]
    fn test_walker_limit_and_advance() {
        let data = vec![run(16, 0); 20 * 5];
        let mut walker = LineWalker::new(&data, 0, 0).with_limit(4);
        assert_eq!(walker.advance_to(3), Some(60));
        assert_eq!(walker.position(), (3, 60));
        assert!(walker.next().is_some());
        assert!(walker.next().is_none());
        assert_eq!(walker.advance_to(4), None);
        // Cannot move backwards.
        assert_eq!(walker.advance_to(1), None);
    }
}
