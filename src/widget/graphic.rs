//! Graphic - a fixed-size character canvas.
//!
//! The canvas size is set at construction and does not follow later
//! `set_dimensions` calls. When the canvas and the visible interior differ,
//! the alignment flags decide which part of the canvas shows.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::device::Console;
use crate::error::{Error, Result};
use crate::input::MouseEvent;
use crate::types::{Boundary, DrawMode, Position, Reply};

use super::frame::Frame;
use super::BoxWidget;

const CANVAS_FILL: char = ' ';

// =============================================================================
// GRAPHIC LINE
// =============================================================================

/// One row of a canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicLine {
    cells: Vec<char>,
}

impl GraphicLine {
    fn blank(width: usize) -> Self {
        Self {
            cells: vec![CANVAS_FILL; width],
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Replace the row with `text`, truncated or blank-padded to the width.
    pub fn set(&mut self, text: &str) {
        let mut chars = text.chars();
        for cell in self.cells.iter_mut() {
            *cell = chars.next().unwrap_or(CANVAS_FILL);
        }
    }

    pub fn at(&self, index: usize) -> Result<char> {
        self.cells.get(index).copied().ok_or(Error::CanvasIndex {
            index,
            len: self.cells.len(),
        })
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut char> {
        let len = self.cells.len();
        self.cells.get_mut(index).ok_or(Error::CanvasIndex { index, len })
    }

    pub fn fill(&mut self, c: char) {
        self.cells.fill(c);
    }

    pub fn as_slice(&self) -> &[char] {
        &self.cells
    }
}

impl Index<usize> for GraphicLine {
    type Output = char;

    fn index(&self, index: usize) -> &char {
        &self.cells[index]
    }
}

impl IndexMut<usize> for GraphicLine {
    fn index_mut(&mut self, index: usize) -> &mut char {
        &mut self.cells[index]
    }
}

impl fmt::Display for GraphicLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cells.iter().try_for_each(|c| fmt::Write::write_char(f, *c))
    }
}

// =============================================================================
// GRAPHIC
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct Graphic {
    frame: Frame,
    canvas: Vec<GraphicLine>,
}

impl Graphic {
    /// Box and canvas both start at `width` x `height`.
    pub fn new(width: i32, height: i32) -> Self {
        let frame = Frame::new(width, height);
        let canvas = (0..frame.target_height())
            .map(|_| GraphicLine::blank(frame.target_width() as usize))
            .collect();
        Self { frame, canvas }
    }

    pub fn canvas_width(&self) -> usize {
        self.canvas.first().map_or(0, GraphicLine::len)
    }

    pub fn canvas_height(&self) -> usize {
        self.canvas.len()
    }

    /// Unchecked row access; panics when out of range.
    pub fn line(&self, row: usize) -> &GraphicLine {
        &self.canvas[row]
    }

    pub fn line_mut(&mut self, row: usize) -> &mut GraphicLine {
        &mut self.canvas[row]
    }

    pub fn at(&self, row: usize) -> Result<&GraphicLine> {
        let len = self.canvas.len();
        self.canvas.get(row).ok_or(Error::CanvasIndex { index: row, len })
    }

    pub fn at_mut(&mut self, row: usize) -> Result<&mut GraphicLine> {
        let len = self.canvas.len();
        self.canvas.get_mut(row).ok_or(Error::CanvasIndex { index: row, len })
    }

    /// Blank every cell.
    pub fn clear(&mut self) {
        for line in self.canvas.iter_mut() {
            line.fill(CANVAS_FILL);
        }
    }

    fn paint_canvas(&self, console: &Console, mode: DrawMode) {
        let frame = &self.frame;
        let visible_w = frame.printable_width();
        let visible_h = frame.printable_height();
        if visible_w <= 0 || visible_h <= 0 || self.canvas.is_empty() {
            return;
        }

        let origin = frame.absolute_position();
        let left = origin.col + frame.vertical_border();
        let top = origin.row + frame.horizontal_border();
        let canvas_w = self.canvas_width() as i32;
        let canvas_h = self.canvas_height() as i32;

        if canvas_w == visible_w && canvas_h == visible_h {
            for (i, line) in self.canvas.iter().enumerate() {
                console.write(mode, Position::new(left, top + i as i32), &line.to_string());
            }
            return;
        }

        // Canvas cell (c, r) lands at (left + dx + c, top + dy + r).
        let dx = frame.alignment().horizontal().offset(visible_w, canvas_w);
        let dy = frame.alignment().vertical().offset(visible_h, canvas_h);
        let first_col = (-dx).max(0);
        let last_col = (visible_w - dx).min(canvas_w);
        if first_col >= last_col {
            return;
        }

        for r in 0..canvas_h {
            let screen_row = top + dy + r;
            if screen_row < top || screen_row >= top + visible_h {
                continue;
            }
            let cells = &self.canvas[r as usize].as_slice()[first_col as usize..last_col as usize];
            let text: String = cells.iter().collect();
            console.write(mode, Position::new(left + dx + first_col, screen_row), &text);
        }
    }
}

impl Index<usize> for Graphic {
    type Output = GraphicLine;

    fn index(&self, row: usize) -> &GraphicLine {
        self.line(row)
    }
}

impl IndexMut<usize> for Graphic {
    fn index_mut(&mut self, row: usize) -> &mut GraphicLine {
        self.line_mut(row)
    }
}

/// Rows joined by `'\n'`.
impl fmt::Display for Graphic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.canvas.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{line}")?;
        }
        Ok(())
    }
}

impl BoxWidget for Graphic {
    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn print_protocol(&mut self, console: &Console, pos: Position, container: Boundary, mode: DrawMode) -> Reply {
        self.frame.print_base(console, pos, container, mode);
        self.paint_canvas(console, mode);
        self.frame.set_drawn(true);
        Reply::Continue
    }

    fn interact(&mut self, _console: &Console, _event: &MouseEvent) -> Reply {
        Reply::Ignored
    }
}
