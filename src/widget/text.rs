//! TextBox and the word-wrap used by every text widget.
//!
//! # Wrapping
//!
//! [`split_text`] is a greedy wrap: each line takes as many whole words as
//! fit the printable width, the space at the cut is consumed, and a word
//! longer than the width is cut at the width. `'\n'` forces a break.
//!
//! Lines are then padded for horizontal alignment and the block is offset
//! vertically within the printable rows.

use crate::device::Console;
use crate::input::MouseEvent;
use crate::types::{AxisPlacement, Boundary, DrawMode, Position, Reply};

use super::frame::Frame;
use super::BoxWidget;

// =============================================================================
// WRAPPING HELPERS
// =============================================================================

/// Greedy word wrap to `width` columns. Returns no lines if `width <= 0`.
pub fn split_text(text: &str, width: i32) -> Vec<String> {
    if width <= 0 {
        return Vec::new();
    }
    let width = width as usize;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let chars: Vec<char> = paragraph.chars().collect();
        if chars.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut start = 0;
        while start < chars.len() {
            let remaining = chars.len() - start;
            if remaining <= width {
                lines.push(chars[start..].iter().collect());
                break;
            }

            // A space at start + width still lets `width` characters fit.
            let window = &chars[start..=start + width];
            match window.iter().rposition(|&c| c == ' ').filter(|&i| i > 0) {
                Some(cut) => {
                    lines.push(chars[start..start + cut].iter().collect());
                    start += cut + 1;
                }
                None => {
                    lines.push(chars[start..start + width].iter().collect());
                    start += width;
                }
            }
        }
    }

    lines
}

/// Left-pad each line for the horizontal placement.
pub fn align_lines(lines: &mut [String], width: i32, placement: AxisPlacement) {
    if placement == AxisPlacement::Start {
        return;
    }
    for line in lines.iter_mut() {
        let pad = placement.offset(width, line.chars().count() as i32);
        if pad > 0 {
            line.insert_str(0, &" ".repeat(pad as usize));
        }
    }
}

/// Row offset of a block of `count` lines inside `printable` rows.
/// Zero when the block fills or overflows the rows.
pub fn vertical_offset(count: usize, printable: i32, placement: AxisPlacement) -> i32 {
    let count = count.min(i32::MAX as usize) as i32;
    if count >= printable {
        return 0;
    }
    placement.offset(printable, count)
}

/// Paint `lines` into a frame's printable area.
///
/// Each printable row that receives a line is blanked first when `clear` is
/// set. Lines are truncated to the printable width.
pub fn paint_lines(frame: &Frame, console: &Console, mode: DrawMode, lines: &[String], clear: bool) {
    let printable = frame.printable_height();
    let width = frame.printable_width();
    if printable <= 0 || width <= 0 {
        return;
    }

    let offset = vertical_offset(lines.len(), printable, frame.alignment().vertical());
    let origin = frame.absolute_position();
    let col = origin.col + frame.vertical_border();
    let top = origin.row + frame.horizontal_border() + offset;
    let blank = " ".repeat(width as usize);

    for (i, line) in lines.iter().take(printable as usize).enumerate() {
        let at = Position::new(col, top + i as i32);
        if clear {
            console.write(mode, at, &blank);
        }
        let visible: String = line.chars().take(width as usize).collect();
        console.write(mode, at, &visible);
    }
}

// =============================================================================
// TEXT BOX
// =============================================================================

/// Static, wrapped, aligned text.
#[derive(Debug, Clone, Default)]
pub struct TextBox {
    frame: Frame,
    text: String,
}

impl TextBox {
    pub fn new(width: i32, height: i32, text: impl Into<String>) -> Self {
        Self {
            frame: Frame::new(width, height),
            text: text.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Wrapped and horizontally aligned lines for the current actual width.
    pub fn lines(&self) -> Vec<String> {
        lines_for(&self.frame, &self.text)
    }

    /// Base plus text. Shared by the button family.
    pub(crate) fn paint(&mut self, console: &Console, pos: Position, container: Boundary, mode: DrawMode) -> Reply {
        self.frame.print_base(console, pos, container, mode);
        let lines = self.lines();
        paint_lines(&self.frame, console, mode, &lines, false);
        self.frame.set_drawn(true);
        Reply::Continue
    }
}

/// Wrap `text` to a frame's printable width and apply its alignment.
pub(crate) fn lines_for(frame: &Frame, text: &str) -> Vec<String> {
    let width = frame.printable_width();
    let mut lines = split_text(text, width);
    align_lines(&mut lines, width, frame.alignment().horizontal());
    lines
}

impl BoxWidget for TextBox {
    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn print_protocol(&mut self, console: &Console, pos: Position, container: Boundary, mode: DrawMode) -> Reply {
        self.paint(console, pos, container, mode)
    }

    fn interact(&mut self, _console: &Console, _event: &MouseEvent) -> Reply {
        Reply::Ignored
    }
}

// =============================================================================
// TESTS
// =============================================================================
