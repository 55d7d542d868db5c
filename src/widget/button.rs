//! Clickable text boxes.
//!
//! A [`Button`] is a [`TextBox`] plus a click handler. [`ExitButton`] always
//! answers `Exit` so the owning menu's loop ends. [`MenuButton`] enters a
//! sub-menu and hands that menu's exit reply back up.
//!
//! All three share the same gate before acting:
//!
//! | Condition                          | Reply     |
//! |------------------------------------|-----------|
//! | not drawn yet (or nothing to run)  | `Failed`  |
//! | position outside the button        | `Ignored` |
//! | not a left-button `Clicked` event  | `Ignored` |

use std::fmt;
use std::sync::Arc;

use crate::device::Console;
use crate::input::MouseEvent;
use crate::menu::Menu;
use crate::types::{Boundary, DrawMode, Position, Reply};

use super::frame::Frame;
use super::text::TextBox;
use super::BoxWidget;

/// Click callback. Receives the clicked button.
pub type ButtonHandler = Arc<dyn Fn(&mut Button) -> Reply + Send + Sync>;

// =============================================================================
// BUTTON
// =============================================================================

#[derive(Clone, Default)]
pub struct Button {
    text: TextBox,
    handler: Option<ButtonHandler>,
}

impl Button {
    pub fn new(width: i32, height: i32, text: impl Into<String>) -> Self {
        Self {
            text: TextBox::new(width, height, text),
            handler: None,
        }
    }

    /// Builder form of [`Button::set_action`].
    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut Button) -> Reply + Send + Sync + 'static,
    {
        self.set_action(action);
        self
    }

    pub fn set_action<F>(&mut self, action: F)
    where
        F: Fn(&mut Button) -> Reply + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(action));
    }

    pub fn clear_action(&mut self) {
        self.handler = None;
    }

    pub fn has_action(&self) -> bool {
        self.handler.is_some()
    }

    pub fn text(&self) -> &str {
        self.text.text()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text.set_text(text);
    }

    /// `Some(Ignored)` when the event is not a left click on this button.
    fn gate(&self, event: &MouseEvent) -> Option<Reply> {
        if !self.frame().pos_in_bounds(event.position) {
            return Some(Reply::Ignored);
        }
        if !event.is_left_click() {
            return Some(Reply::Ignored);
        }
        None
    }

    fn run_handler(&mut self) -> Option<Reply> {
        let handler = self.handler.clone()?;
        Some(handler(self))
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("text", &self.text)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

impl BoxWidget for Button {
    fn frame(&self) -> &Frame {
        self.text.frame()
    }

    fn frame_mut(&mut self) -> &mut Frame {
        self.text.frame_mut()
    }

    fn print_protocol(&mut self, console: &Console, pos: Position, container: Boundary, mode: DrawMode) -> Reply {
        self.text.paint(console, pos, container, mode)
    }

    fn interact(&mut self, _console: &Console, event: &MouseEvent) -> Reply {
        if !self.frame().is_drawn() || self.handler.is_none() {
            return Reply::Failed;
        }
        if let Some(reply) = self.gate(event) {
            return reply;
        }
        self.run_handler().unwrap_or(Reply::Failed)
    }
}

// =============================================================================
// EXIT BUTTON
// =============================================================================

/// Ends the owning menu. The handler, if any, runs first and its reply is
/// discarded.
#[derive(Debug, Clone, Default)]
pub struct ExitButton {
    button: Button,
}

impl ExitButton {
    pub fn new(width: i32, height: i32, text: impl Into<String>) -> Self {
        Self {
            button: Button::new(width, height, text),
        }
    }

    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut Button) -> Reply + Send + Sync + 'static,
    {
        self.button.set_action(action);
        self
    }

    pub fn button(&self) -> &Button {
        &self.button
    }

    pub fn button_mut(&mut self) -> &mut Button {
        &mut self.button
    }
}

impl BoxWidget for ExitButton {
    fn frame(&self) -> &Frame {
        self.button.frame()
    }

    fn frame_mut(&mut self) -> &mut Frame {
        self.button.frame_mut()
    }

    fn print_protocol(&mut self, console: &Console, pos: Position, container: Boundary, mode: DrawMode) -> Reply {
        self.button.print_protocol(console, pos, container, mode)
    }

    fn interact(&mut self, _console: &Console, event: &MouseEvent) -> Reply {
        if !self.frame().is_drawn() {
            return Reply::Failed;
        }
        if let Some(reply) = self.button.gate(event) {
            return reply;
        }
        self.button.run_handler();
        Reply::Exit
    }
}

// =============================================================================
// MENU BUTTON
// =============================================================================

/// Opens a sub-menu when clicked.
///
/// The click only records the request. The owning menu enters the sub-menu
/// after dispatch has released its root, and treats the sub-menu's exit
/// reply as the reply to the click. A sub-menu may already be on the stack
/// (back-navigation); it is simply entered again.
#[derive(Debug, Clone, Default)]
pub struct MenuButton {
    button: Button,
    menu: Option<Menu>,
    pending: bool,
}

impl MenuButton {
    pub fn new(width: i32, height: i32, text: impl Into<String>) -> Self {
        Self {
            button: Button::new(width, height, text),
            menu: None,
            pending: false,
        }
    }

    pub fn with_menu(mut self, menu: &Menu) -> Self {
        self.menu = Some(menu.clone());
        self
    }

    /// Pre-entry handler. Its reply is discarded.
    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut Button) -> Reply + Send + Sync + 'static,
    {
        self.button.set_action(action);
        self
    }

    pub fn set_menu(&mut self, menu: &Menu) {
        self.menu = Some(menu.clone());
    }

    pub fn menu(&self) -> Option<&Menu> {
        self.menu.as_ref()
    }

    pub fn button_mut(&mut self) -> &mut Button {
        &mut self.button
    }

    /// True between a click and the owning menu picking up the request.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Hand over the sub-menu requested by the last click, once.
    pub fn take_pending(&mut self) -> Option<Menu> {
        if !std::mem::take(&mut self.pending) {
            return None;
        }
        self.menu.clone()
    }
}

impl BoxWidget for MenuButton {
    fn frame(&self) -> &Frame {
        self.button.frame()
    }

    fn frame_mut(&mut self) -> &mut Frame {
        self.button.frame_mut()
    }

    fn print_protocol(&mut self, console: &Console, pos: Position, container: Boundary, mode: DrawMode) -> Reply {
        self.button.print_protocol(console, pos, container, mode)
    }

    fn interact(&mut self, _console: &Console, event: &MouseEvent) -> Reply {
        if !self.frame().is_drawn() {
            return Reply::Failed;
        }
        if self.menu.is_none() {
            return Reply::Failed;
        }
        if let Some(reply) = self.button.gate(event) {
            return reply;
        }
        self.button.run_handler();
        self.pending = true;
        Reply::Continue
    }
}

// =============================================================================
// TESTS
// =============================================================================
