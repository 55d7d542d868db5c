//! EntryTextBox - keyboard text entry with focus capture.
//!
//! A left click on the box starts an interaction: the box reports
//! [`EntryTextBox::is_interacting`] and the owning menu routes every raw
//! input event to [`EntryTextBox::handle_focus_input`] until the box releases
//! focus. Hooks and other widgets see nothing in the meantime.
//!
//! While focused:
//!
//! - `Enter` runs the process handler and releases focus.
//! - A click outside the box runs the cancel handler and releases focus.
//! - Backspace removes the last character.
//! - Printable ASCII (32..=126) is appended if the input filter accepts it.
//! - Key releases, resizes and mouse events inside the box are ignored.

use std::fmt;
use std::sync::Arc;

use crate::device::Console;
use crate::input::{InputEvent, MouseEvent};
use crate::types::{Boundary, DrawMode, Position, Reply};

use super::frame::Frame;
use super::text::{TextBox, lines_for, paint_lines};
use super::BoxWidget;

/// Accepts or rejects a typed character.
pub type InputFilter = Arc<dyn Fn(char) -> bool + Send + Sync>;

/// Receives the accumulated input on process or cancel. May edit it.
pub type TextHandler = Arc<dyn Fn(&mut String) + Send + Sync>;

/// Result of feeding one event to a focused entry box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusOutcome {
    /// Nothing changed.
    Ignored,
    /// The input text changed.
    Changed,
    /// Focus was given up.
    Released,
}

#[derive(Clone, Default)]
pub struct EntryTextBox {
    text: TextBox,
    display_text: String,
    input: String,
    interacting: bool,
    auto_menu_refresh: bool,
    filter: Option<InputFilter>,
    cancel_handler: Option<TextHandler>,
    process_handler: Option<TextHandler>,
}

impl EntryTextBox {
    /// `display_text` is shown while idle; when empty, the input is shown.
    pub fn new(width: i32, height: i32, display_text: impl Into<String>) -> Self {
        let display_text = display_text.into();
        Self {
            text: TextBox::new(width, height, display_text.clone()),
            display_text,
            ..Self::default()
        }
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    pub fn set_display_text(&mut self, text: impl Into<String>) {
        self.display_text = text.into();
        self.text.set_text(self.display_text.clone());
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn set_input_filter<F>(&mut self, filter: F)
    where
        F: Fn(char) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
    }

    pub fn set_cancel_handler<F>(&mut self, handler: F)
    where
        F: Fn(&mut String) + Send + Sync + 'static,
    {
        self.cancel_handler = Some(Arc::new(handler));
    }

    pub fn set_process_handler<F>(&mut self, handler: F)
    where
        F: Fn(&mut String) + Send + Sync + 'static,
    {
        self.process_handler = Some(Arc::new(handler));
    }

    /// Repaint the owning menu after every change while focused.
    pub fn set_auto_menu_refresh(&mut self, refresh: bool) {
        self.auto_menu_refresh = refresh;
    }

    pub fn auto_menu_refresh(&self) -> bool {
        self.auto_menu_refresh
    }

    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    /// Feed one raw event while this box holds focus.
    pub fn handle_focus_input(&mut self, event: &InputEvent) -> FocusOutcome {
        if !self.interacting {
            return FocusOutcome::Ignored;
        }
        match event {
            InputEvent::Mouse(mouse) => {
                if self.frame().pos_in_bounds(mouse.position) || !mouse.is_left_click() {
                    return FocusOutcome::Ignored;
                }
                tracing::debug!(input = %self.input, "entry cancelled");
                self.finish(self.cancel_handler.clone())
            }
            InputEvent::Key(key) if key.key_down => {
                if key.is_enter() {
                    tracing::debug!(input = %self.input, "entry processed");
                    return self.finish(self.process_handler.clone());
                }
                if key.is_backspace() {
                    return match self.input.pop() {
                        Some(_) => FocusOutcome::Changed,
                        None => FocusOutcome::Ignored,
                    };
                }
                if !key.is_printable() {
                    return FocusOutcome::Ignored;
                }
                let accepted = self.filter.as_ref().is_none_or(|filter| filter(key.character));
                if !accepted {
                    return FocusOutcome::Ignored;
                }
                self.input.push(key.character);
                FocusOutcome::Changed
            }
            _ => FocusOutcome::Ignored,
        }
    }

    /// Give up focus without running a handler.
    pub fn release_focus(&mut self) {
        self.interacting = false;
    }

    fn finish(&mut self, handler: Option<TextHandler>) -> FocusOutcome {
        if let Some(handler) = handler {
            handler(&mut self.input);
        }
        self.interacting = false;
        FocusOutcome::Released
    }

    /// Paint the input so the most recent characters stay visible.
    fn paint_interacting(&mut self, console: &Console, pos: Position, container: Boundary, mode: DrawMode) {
        let frame = self.text.frame_mut();
        frame.print_base(console, pos, container, mode);

        let printable = frame.printable_height();
        let width = frame.printable_width();
        if printable <= 0 || width <= 0 || self.input.is_empty() {
            return;
        }

        if printable == 1 {
            let skip = self.input.chars().count().saturating_sub(width as usize);
            let tail: String = self.input.chars().skip(skip).collect();
            let origin = frame.absolute_position();
            let at = Position::new(origin.col + frame.vertical_border(), origin.row + frame.horizontal_border());
            console.write(mode, at, &tail);
            return;
        }

        let lines = lines_for(frame, &self.input);
        let first = lines.len().saturating_sub(printable as usize);
        paint_lines(frame, console, mode, &lines[first..], false);
    }
}

impl fmt::Debug for EntryTextBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryTextBox")
            .field("frame", self.text.frame())
            .field("display_text", &self.display_text)
            .field("input", &self.input)
            .field("interacting", &self.interacting)
            .field("auto_menu_refresh", &self.auto_menu_refresh)
            .finish_non_exhaustive()
    }
}

impl BoxWidget for EntryTextBox {
    fn frame(&self) -> &Frame {
        self.text.frame()
    }

    fn frame_mut(&mut self) -> &mut Frame {
        self.text.frame_mut()
    }

    fn print_protocol(&mut self, console: &Console, pos: Position, container: Boundary, mode: DrawMode) -> Reply {
        if self.interacting {
            self.paint_interacting(console, pos, container, mode);
            self.text.frame_mut().set_drawn(true);
            return Reply::Continue;
        }
        let shown = if self.display_text.is_empty() {
            self.input.clone()
        } else {
            self.display_text.clone()
        };
        self.text.set_text(shown);
        self.text.paint(console, pos, container, mode)
    }

    /// Start an interaction on a left click inside the box.
    fn interact(&mut self, _console: &Console, event: &MouseEvent) -> Reply {
        if !self.frame().is_drawn() {
            return Reply::Failed;
        }
        if !self.frame().pos_in_bounds(event.position) || !event.is_left_click() {
            return Reply::Ignored;
        }
        tracing::debug!("entry focused");
        self.interacting = true;
        Reply::Continue
    }
}
