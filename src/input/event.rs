//! Input event model.
//!
//! Everything a device can deliver to a menu: mouse records, key records and
//! window resizes. `Invalid` doubles as the veto marker used by input hooks
//! and as the value returned once the device has no more input.
//!
//! # Example
//!
//! ```
//! use boxterm::input::{InputEvent, MouseEvent, MouseKind};
//! use boxterm::Position;
//!
//! let event = InputEvent::Mouse(MouseEvent::click(Position::new(4, 2)));
//! match event {
//!     InputEvent::Mouse(mouse) => assert_eq!(mouse.kind, MouseKind::Clicked),
//!     _ => unreachable!(),
//! }
//! ```

use crate::types::Position;

/// Character delivered for the Enter key.
pub const KEY_ENTER: char = '\r';

/// Character delivered for the Backspace key.
pub const KEY_BACKSPACE: char = '\u{8}';

/// Alternate Backspace code sent by many terminals (DEL).
pub const KEY_DELETE: char = '\u{7f}';

/// Character delivered for Escape.
pub const KEY_ESCAPE: char = '\u{1b}';

// =============================================================================
// MOUSE
// =============================================================================

/// What happened to the mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseKind {
    /// A button went down.
    #[default]
    Clicked,
    DoubleClicked,
    /// Wheel rotated away from the user (scroll up).
    WheeledForward,
    /// Wheel rotated toward the user (scroll down).
    WheeledBackward,
    WheeledLeft,
    WheeledRight,
    /// Pointer moved; filtered out by `Console::get_button_input`.
    Moved,
}

/// Mouse record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseEvent {
    /// Console cell under the pointer.
    pub position: Position,
    pub kind: MouseKind,
    /// Left button held.
    pub left_click: bool,
    /// Right button held.
    pub right_click: bool,
}

impl MouseEvent {
    pub fn new(position: Position, kind: MouseKind) -> Self {
        Self {
            position,
            kind,
            left_click: false,
            right_click: false,
        }
    }

    /// Left button press.
    pub fn click(position: Position) -> Self {
        Self {
            left_click: true,
            ..Self::new(position, MouseKind::Clicked)
        }
    }

    /// Right button press.
    pub fn right_click(position: Position) -> Self {
        Self {
            right_click: true,
            ..Self::new(position, MouseKind::Clicked)
        }
    }

    /// Button release; reported as a click with no button held.
    pub fn release(position: Position) -> Self {
        Self::new(position, MouseKind::Clicked)
    }

    pub fn wheel(position: Position, kind: MouseKind) -> Self {
        Self::new(position, kind)
    }

    pub fn moved(position: Position) -> Self {
        Self::new(position, MouseKind::Moved)
    }

    /// A fresh left-button press, the only thing buttons react to.
    #[inline]
    pub fn is_left_click(&self) -> bool {
        self.kind == MouseKind::Clicked && self.left_click
    }
}

// =============================================================================
// KEYBOARD
// =============================================================================

bitflags::bitflags! {
    /// Modifier keys held during a key record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct KeyModifiers: u8 {
        const NONE = 0;
        const CAPSLOCK = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const SHIFT = 1 << 3;
    }
}

/// Key record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub modifiers: KeyModifiers,
    /// True on press, false on release.
    pub key_down: bool,
    /// Auto-repeat count reported by the device.
    pub repeat_count: u16,
    /// Character code; control keys use their ASCII codes (Enter is `'\r'`).
    pub character: char,
}

impl KeyEvent {
    pub fn press(character: char) -> Self {
        Self {
            modifiers: KeyModifiers::NONE,
            key_down: true,
            repeat_count: 1,
            character,
        }
    }

    pub fn release(character: char) -> Self {
        Self {
            key_down: false,
            ..Self::press(character)
        }
    }

    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Printable ASCII (space through tilde).
    #[inline]
    pub fn is_printable(&self) -> bool {
        (' '..='~').contains(&self.character)
    }

    #[inline]
    pub fn is_enter(&self) -> bool {
        self.character == KEY_ENTER || self.character == '\n'
    }

    #[inline]
    pub fn is_backspace(&self) -> bool {
        self.character == KEY_BACKSPACE || self.character == KEY_DELETE
    }
}

// =============================================================================
// INPUT EVENT
// =============================================================================

/// Any record read from the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputEvent {
    Mouse(MouseEvent),
    Key(KeyEvent),
    /// New window dimensions (columns, rows).
    Resize(Position),
    /// Vetoed by a hook, unreadable, or input exhausted.
    #[default]
    Invalid,
}

impl InputEvent {
    #[inline]
    pub fn is_invalid(&self) -> bool {
        matches!(self, InputEvent::Invalid)
    }

    pub fn as_mouse(&self) -> Option<&MouseEvent> {
        match self {
            InputEvent::Mouse(mouse) => Some(mouse),
            _ => None,
        }
    }

    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            InputEvent::Key(key) => Some(key),
            _ => None,
        }
    }

    /// Mark as consumed. Hooks call this to stop the chain and keep the
    /// event away from widgets.
    #[inline]
    pub fn invalidate(&mut self) {
        *self = InputEvent::Invalid;
    }
}

impl From<MouseEvent> for InputEvent {
    fn from(mouse: MouseEvent) -> Self {
        InputEvent::Mouse(mouse)
    }
}

impl From<KeyEvent> for InputEvent {
    fn from(key: KeyEvent) -> Self {
        InputEvent::Key(key)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_is_left_click() {
        let click = MouseEvent::click(Position::new(1, 1));
        assert!(click.is_left_click());
        assert!(!MouseEvent::right_click(Position::new(1, 1)).is_left_click());
        assert!(!MouseEvent::release(Position::new(1, 1)).is_left_click());
        assert!(!MouseEvent::moved(Position::new(1, 1)).is_left_click());
    }

    #[test]
    fn test_key_classification() {
        assert!(KeyEvent::press('a').is_printable());
        assert!(KeyEvent::press(' ').is_printable());
        assert!(KeyEvent::press('~').is_printable());
        assert!(!KeyEvent::press(KEY_ENTER).is_printable());
        assert!(KeyEvent::press(KEY_ENTER).is_enter());
        assert!(KeyEvent::press(KEY_BACKSPACE).is_backspace());
        assert!(KeyEvent::press(KEY_DELETE).is_backspace());
        assert!(!KeyEvent::release('a').key_down);
    }

    #[test]
    fn test_invalidate() {
        let mut event: InputEvent = KeyEvent::press('q').into();
        assert!(!event.is_invalid());
        event.invalidate();
        assert!(event.is_invalid());
        assert!(event.as_key().is_none());
    }

    #[test]
    fn test_modifiers_combine() {
        let key = KeyEvent::press('c').with_modifiers(KeyModifiers::CTRL | KeyModifiers::SHIFT);
        assert!(key.modifiers.contains(KeyModifiers::CTRL));
        assert!(!key.modifiers.contains(KeyModifiers::ALT));
    }
}
