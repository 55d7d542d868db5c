//! Off-screen write buffer.
//!
//! A window-sized grid of characters that widgets paint into when a menu is
//! printed in buffered mode. The console flushes it to the device in one
//! batch, skipping rows that have not changed since the previous flush.
//!
//! # Design Decisions
//!
//! - **Flat storage**: `Vec<char>` with row-major indexing.
//! - **Clipping**: writes outside the grid are dropped, never wrapped.
//! - **Row diffing**: a copy of the last flushed frame decides which rows to
//!   send. Any immediate screen write invalidates it.

use crate::types::Position;

/// A 2D grid of characters, `index = row * width + col`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WriteBuffer {
    width: usize,
    height: usize,
    cells: Vec<char>,
    /// Frame as of the last flush, `None` when the screen state is unknown.
    flushed: Option<Vec<char>>,
}

impl WriteBuffer {
    /// Create a blank buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; width * height],
            flushed: None,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocate to new dimensions. Contents are cleared.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![' '; width * height];
        self.flushed = None;
    }

    /// Blank every cell.
    pub fn clear(&mut self) {
        self.cells.fill(' ');
    }

    /// Forget what was last flushed; the next flush sends every row.
    pub fn invalidate(&mut self) {
        self.flushed = None;
    }

    /// Write `text` starting at `pos`, clipped to the grid.
    ///
    /// A start position outside the grid writes nothing.
    pub fn write(&mut self, pos: Position, text: &str) {
        if pos.col < 0 || pos.row < 0 {
            return;
        }
        let (col, row) = (pos.col as usize, pos.row as usize);
        if col >= self.width || row >= self.height {
            return;
        }

        let start = row * self.width;
        let line = &mut self.cells[start + col..start + self.width];
        for (cell, ch) in line.iter_mut().zip(text.chars()) {
            *cell = ch;
        }
    }

    /// Character at a cell, `None` outside the grid.
    pub fn get(&self, col: usize, row: usize) -> Option<char> {
        if col < self.width && row < self.height {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    /// One row as a string.
    pub fn row(&self, row: usize) -> Option<String> {
        if row >= self.height {
            return None;
        }
        let start = row * self.width;
        Some(self.cells[start..start + self.width].iter().collect())
    }

    /// Rows that differ from the last flush (every row if unknown), then
    /// record the current frame as flushed.
    pub fn take_dirty_rows(&mut self) -> Vec<(usize, String)> {
        let mut dirty = Vec::new();
        for row in 0..self.height {
            let start = row * self.width;
            let end = start + self.width;
            let changed = match &self.flushed {
                Some(prev) => prev[start..end] != self.cells[start..end],
                None => true,
            };
            if changed {
                dirty.push((row, self.cells[start..end].iter().collect()));
            }
        }
        self.flushed = Some(self.cells.clone());
        dirty
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_blank() {
        let buf = WriteBuffer::new(4, 2);
        assert_eq!(buf.row(0).unwrap(), "    ");
        assert_eq!(buf.row(1).unwrap(), "    ");
        assert!(buf.row(2).is_none());
    }

    #[test]
    fn test_write_clips_at_right_edge() {
        let mut buf = WriteBuffer::new(5, 1);
        buf.write(Position::new(3, 0), "hello");
        assert_eq!(buf.row(0).unwrap(), "   he");
    }

    #[test]
    fn test_write_outside_is_dropped() {
        let mut buf = WriteBuffer::new(5, 2);
        buf.write(Position::new(-1, 0), "x");
        buf.write(Position::new(0, 2), "x");
        buf.write(Position::new(5, 0), "x");
        assert_eq!(buf.row(0).unwrap(), "     ");
        assert_eq!(buf.row(1).unwrap(), "     ");
    }

    #[test]
    fn test_write_does_not_wrap_rows() {
        let mut buf = WriteBuffer::new(3, 2);
        buf.write(Position::new(1, 0), "abcdef");
        assert_eq!(buf.row(0).unwrap(), " ab");
        assert_eq!(buf.row(1).unwrap(), "   ");
    }

    #[test]
    fn test_dirty_rows_after_first_flush() {
        let mut buf = WriteBuffer::new(3, 3);
        assert_eq!(buf.take_dirty_rows().len(), 3);

        buf.write(Position::new(0, 1), "x");
        let dirty = buf.take_dirty_rows();
        assert_eq!(dirty, vec![(1, "x  ".to_string())]);

        assert!(buf.take_dirty_rows().is_empty());

        buf.invalidate();
        assert_eq!(buf.take_dirty_rows().len(), 3);
    }

    #[test]
    fn test_resize_clears() {
        let mut buf = WriteBuffer::new(2, 2);
        buf.write(Position::new(0, 0), "ab");
        buf.resize(3, 1);
        assert_eq!(buf.width(), 3);
        assert_eq!(buf.height(), 1);
        assert_eq!(buf.row(0).unwrap(), "   ");
        assert_eq!(buf.get(0, 0), Some(' '));
    }
}
