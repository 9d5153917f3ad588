//! Sparse line index.
//!
//! Storing one offset per line would cost as much memory as the line count,
//! so the index keeps a checkpoint every [`SAMPLE_INTERVAL`] lines and
//! reconstructs any other offset by walking forward from the nearest
//! checkpoint. A lookup scans at most `SAMPLE_INTERVAL - 1` lines.

use crate::error::CodecError;
use crate::scanner::{estimate_line_count, LineWalker};
use tracing::debug;

/// Number of lines between stored checkpoints.
pub const SAMPLE_INTERVAL: usize = 64;

/// Checkpointed offset table over a line stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseLineIndex {
    /// Entry `k` is the byte offset of line `k * SAMPLE_INTERVAL`.
    samples: Vec<usize>,
    line_count: usize,
}

impl SparseLineIndex {
    /// Walk the whole buffer once, recording a checkpoint every
    /// [`SAMPLE_INTERVAL`] lines.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Allocation`] if the sample table cannot be
    /// reserved.
    pub fn build(data: &[u8]) -> Result<Self, CodecError> {
        let estimate = estimate_line_count(data);

        let mut samples = Vec::new();
        samples
            .try_reserve_exact(estimate.div_ceil(SAMPLE_INTERVAL))
            .map_err(|_| CodecError::Allocation { lines: estimate })?;

        let mut scanned = 0usize;
        for line in LineWalker::new(data, 0, 0) {
            if line.index % SAMPLE_INTERVAL == 0 {
                samples
                    .try_reserve(1)
                    .map_err(|_| CodecError::Allocation { lines: line.index })?;
                samples.push(line.offset);
            }
            scanned += 1;
        }

        let line_count = scanned.min(estimate);
        samples.truncate(line_count.div_ceil(SAMPLE_INTERVAL));

        debug!(
            "Indexed {} lines ({} estimated) from {} bytes with {} samples",
            line_count,
            estimate,
            data.len(),
            samples.len()
        );

        Ok(Self {
            samples,
            line_count,
        })
    }

    /// Number of complete lines in the stream.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Returns true if the stream holds no complete line.
    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }

    /// The stored checkpoint offsets.
    pub fn samples(&self) -> &[usize] {
        &self.samples
    }

    /// The checkpoint at or before `line`, as `(line_index, byte_offset)`.
    pub fn checkpoint_for(&self, line: usize) -> (usize, usize) {
        if self.samples.is_empty() {
            return (0, 0);
        }
        let k = (line / SAMPLE_INTERVAL).min(self.samples.len() - 1);
        (k * SAMPLE_INTERVAL, self.samples[k])
    }

    /// Byte offset of `line`, or `None` if it does not exist.
    pub fn offset_of(&self, data: &[u8], line: usize) -> Option<usize> {
        if line >= self.line_count {
            return None;
        }
        let (start, offset) = self.checkpoint_for(line);
        LineWalker::new(data, start, offset)
            .with_limit(self.line_count)
            .advance_to(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `count` lines cycling through three byte lengths (20, 40, 77).
    fn varied_stream(count: usize) -> (Vec<u8>, Vec<usize>) {
        let mut data = Vec::new();
        let mut offsets = Vec::new();
        for i in 0..count {
            offsets.push(data.len());
            match i % 3 {
                0 => data.extend(std::iter::repeat(0xF1).take(20)),
                1 => data.extend(std::iter::repeat(0x72).take(40)),
                _ => {
                    data.extend(std::iter::repeat(0x33).take(76));
                    data.push(0xF4);
                }
            }
        }
        (data, offsets)
    }

    #[test]
    fn test_empty_buffer() {
        let index = SparseLineIndex::build(&[]).unwrap();
        assert!(index.is_empty());
        assert!(index.samples().is_empty());
        assert_eq!(index.offset_of(&[], 0), None);
        assert_eq!(index.checkpoint_for(5), (0, 0));
    }

    #[test]
    fn test_sample_table_layout() {
        let (data, offsets) = varied_stream(200);
        let index = SparseLineIndex::build(&data).unwrap();
        assert_eq!(index.line_count(), 200);
        assert_eq!(index.samples().len(), 4); // ceil(200 / 64)
        for (k, &sample) in index.samples().iter().enumerate() {
            assert_eq!(sample, offsets[k * SAMPLE_INTERVAL]);
        }
        assert!(index.samples().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_offset_of_every_line() {
        let (data, offsets) = varied_stream(150);
        let index = SparseLineIndex::build(&data).unwrap();
        for (line, &expected) in offsets.iter().enumerate() {
            assert_eq!(index.offset_of(&data, line), Some(expected), "line {line}");
        }
        assert_eq!(index.offset_of(&data, 150), None);
    }

    #[test]
    fn test_truncated_final_line_excluded() {
        let (mut data, _) = varied_stream(65);
        // 18 * 16 + 12 = 300 pixels.
        data.extend(std::iter::repeat(0xF0).take(18));
        data.push(0xB0);
        let index = SparseLineIndex::build(&data).unwrap();
        assert_eq!(index.line_count(), 65);
        assert_eq!(index.samples().len(), 2);
        assert_eq!(index.offset_of(&data, 65), None);
    }

    #[test]
    fn test_checkpoint_for() {
        let (data, offsets) = varied_stream(130);
        let index = SparseLineIndex::build(&data).unwrap();
        assert_eq!(index.checkpoint_for(0), (0, 0));
        assert_eq!(index.checkpoint_for(63), (0, 0));
        assert_eq!(index.checkpoint_for(64), (64, offsets[64]));
        assert_eq!(index.checkpoint_for(129), (128, offsets[128]));
        // Clamped to the last sample.
        assert_eq!(index.checkpoint_for(10_000), (128, offsets[128]));
    }
}
