//! Byte → source line mapping, stored as runs.
//!
//! Logically there is one line entry per instruction byte, so `len()` always
//! equals the code length. Physically consecutive bytes on the same line
//! share a single [`LineRun`].

use core::ops::Range;

use crate::buffer::GrowableBuffer;

/// Source line number.
pub type Line = u32;

/// `count` consecutive bytes starting at `start`, all produced by `line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRun {
    /// Offset of the first byte of the run.
    pub start: usize,
    /// Number of bytes in the run.
    pub count: usize,
    /// Source line.
    pub line: Line,
}

impl LineRun {
    /// Byte range covered by the run.
    pub const fn range(&self) -> Range<usize> { self.start..self.start + self.count }
}

/// Run-length encoded line table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineTable {
    runs: GrowableBuffer<LineRun>,
    len: usize,
}

impl LineTable {
    /// Empty table.
    pub const fn new() -> Self { Self { runs: GrowableBuffer::new(), len: 0 } }

    /// Records the line of the next byte.
    pub fn push(&mut self, line: Line) {
        match self.runs.last_mut() {
            Some(run) if run.line == line => run.count += 1,
            _ => {
                self.runs.append(LineRun { start: self.len, count: 1, line });
            }
        }
        self.len += 1;
    }

    /// Number of bytes covered.
    pub fn len(&self) -> usize { self.len }

    /// True when no byte has been recorded.
    pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Line of the byte at `offset`, if recorded.
    pub fn line_at(&self, offset: usize) -> Option<Line> {
        if offset >= self.len {
            return None;
        }
        let runs = self.runs.as_slice();
        // Runs are sorted by `start`; find the last run starting at or before `offset`.
        let idx = runs.partition_point(|run| run.start <= offset);
        runs.get(idx.checked_sub(1)?).map(|run| run.line)
    }

    /// Contiguous runs in offset order.
    pub fn runs(&self) -> &[LineRun] { self.runs.as_slice() }

    /// Per-byte view, expanded from the runs.
    pub fn iter(&self) -> impl Iterator<Item = Line> + '_ {
        self.runs.iter().flat_map(|run| core::iter::repeat(run.line).take(run.count))
    }

    /// Frees the storage.
    pub fn release(&mut self) {
        self.runs.release();
        self.len = 0;
    }
}
