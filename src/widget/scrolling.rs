//! ScrollingTextBox - a text box showing a window of its wrapped lines.

use crate::device::Console;
use crate::input::{MouseEvent, MouseKind};
use crate::types::{Boundary, DrawMode, Position, Reply};

use super::frame::Frame;
use super::text::{lines_for, paint_lines};
use super::BoxWidget;

/// Wheel backward scrolls down one line, wheel forward scrolls up one.
///
/// `scroll_position` is the index of the first visible wrapped line and is
/// kept within `0..=max(0, lines - visible_rows)`.
#[derive(Debug, Clone, Default)]
pub struct ScrollingTextBox {
    frame: Frame,
    text: String,
    scroll_pos: i32,
}

impl ScrollingTextBox {
    pub fn new(width: i32, height: i32, text: impl Into<String>) -> Self {
        Self {
            frame: Frame::new(width, height),
            text: text.into(),
            scroll_pos: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn scroll_position(&self) -> i32 {
        self.scroll_pos
    }

    /// Clamped against the current layout on the next paint or scroll.
    pub fn set_scroll_position(&mut self, pos: i32) {
        self.scroll_pos = pos.max(0);
    }

    fn clamp_scroll(&mut self, line_count: usize) {
        let visible = self.frame.printable_height();
        let max = (line_count.min(i32::MAX as usize) as i32 - visible).max(0);
        self.scroll_pos = self.scroll_pos.clamp(0, max);
    }

    fn paint_visible(&mut self, console: &Console, mode: DrawMode, clear: bool) {
        let lines = lines_for(&self.frame, &self.text);
        self.clamp_scroll(lines.len());
        let start = (self.scroll_pos as usize).min(lines.len());
        paint_lines(&self.frame, console, mode, &lines[start..], clear);
    }
}

impl BoxWidget for ScrollingTextBox {
    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn print_protocol(&mut self, console: &Console, pos: Position, container: Boundary, mode: DrawMode) -> Reply {
        self.frame.print_base(console, pos, container, mode);
        self.paint_visible(console, mode, false);
        self.frame.set_drawn(true);
        Reply::Continue
    }

    fn interact(&mut self, console: &Console, event: &MouseEvent) -> Reply {
        if !self.frame.is_drawn() {
            return Reply::Failed;
        }
        if !self.frame.pos_in_bounds(event.position) {
            return Reply::Ignored;
        }
        match event.kind {
            MouseKind::WheeledBackward => self.scroll_pos = self.scroll_pos.saturating_add(1),
            MouseKind::WheeledForward => self.scroll_pos = self.scroll_pos.saturating_sub(1),
            _ => return Reply::Ignored,
        }
        self.paint_visible(console, DrawMode::Draw, true);
        Reply::Continue
    }
}
