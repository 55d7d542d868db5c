//! Crossterm backend.
//!
//! Bridges crossterm's event system and terminal commands to the
//! [`Terminal`] trait.
//!
//! # API
//!
//! - `convert_mouse_event` - crossterm MouseEvent to our MouseEvent
//! - `convert_key_event` - crossterm KeyEvent to our KeyEvent
//! - `CrosstermTerminal` - the backend itself; `open` refuses a non-tty stdout
//!
//! Crossterm does not report double clicks; a second left press on the same
//! cell within [`DOUBLE_CLICK_WINDOW`] is reported as `DoubleClicked`.

use std::io::{self, Write, stdout};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self as ct_event, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent,
    KeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyEventState,
    KeyModifiers as CrosstermModifiers, MouseButton as CrosstermMouseButton,
    MouseEvent as CrosstermMouseEvent, MouseEventKind,
};
use crossterm::terminal::{
    self as ct_terminal, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetSize,
};
use crossterm::tty::IsTty;
use crossterm::{execute, queue};

use super::Terminal;
use crate::error::{Error, Result};
use crate::input::{
    InputEvent, KEY_BACKSPACE, KEY_ENTER, KEY_ESCAPE, KeyEvent, KeyModifiers, MouseEvent,
    MouseKind,
};
use crate::types::Position;

/// Two left presses on one cell within this window form a double click.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

// =============================================================================
// MOUSE EVENT CONVERSION
// =============================================================================

/// Convert crossterm MouseEvent to our MouseEvent.
pub fn convert_mouse_event(event: CrosstermMouseEvent) -> MouseEvent {
    let position = Position::new(event.column as i32, event.row as i32);
    match event.kind {
        MouseEventKind::Down(CrosstermMouseButton::Left) => MouseEvent::click(position),
        MouseEventKind::Down(CrosstermMouseButton::Right) => MouseEvent::right_click(position),
        MouseEventKind::Down(CrosstermMouseButton::Middle) => MouseEvent::release(position),
        MouseEventKind::Up(_) => MouseEvent::release(position),
        MouseEventKind::Drag(button) => MouseEvent {
            left_click: button == CrosstermMouseButton::Left,
            right_click: button == CrosstermMouseButton::Right,
            ..MouseEvent::moved(position)
        },
        MouseEventKind::Moved => MouseEvent::moved(position),
        MouseEventKind::ScrollUp => MouseEvent::wheel(position, MouseKind::WheeledForward),
        MouseEventKind::ScrollDown => MouseEvent::wheel(position, MouseKind::WheeledBackward),
        MouseEventKind::ScrollLeft => MouseEvent::wheel(position, MouseKind::WheeledLeft),
        MouseEventKind::ScrollRight => MouseEvent::wheel(position, MouseKind::WheeledRight),
    }
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert crossterm KeyEvent to our KeyEvent.
///
/// Keys without a character code (arrows, function keys) map to `'\0'`.
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyEvent {
    let character = match event.code {
        KeyCode::Char(c) => c,
        KeyCode::Enter => KEY_ENTER,
        KeyCode::Backspace => KEY_BACKSPACE,
        KeyCode::Tab => '\t',
        KeyCode::Esc => KEY_ESCAPE,
        _ => '\0',
    };

    KeyEvent {
        modifiers: convert_modifiers(event.modifiers, event.state),
        key_down: event.kind != KeyEventKind::Release,
        repeat_count: 1,
        character,
    }
}

fn convert_modifiers(mods: CrosstermModifiers, state: KeyEventState) -> KeyModifiers {
    let mut out = KeyModifiers::NONE;
    if mods.contains(CrosstermModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if mods.contains(CrosstermModifiers::ALT) {
        out |= KeyModifiers::ALT;
    }
    if mods.contains(CrosstermModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    if state.contains(KeyEventState::CAPS_LOCK) {
        out |= KeyModifiers::CAPSLOCK;
    }
    out
}

// =============================================================================
// CROSSTERM TERMINAL
// =============================================================================

fn require_tty(is_tty: bool) -> Result<()> {
    if is_tty {
        Ok(())
    } else {
        Err(Error::DeviceUnavailable("stdout is not a terminal".to_string()))
    }
}

/// Terminal backend over crossterm and the process's stdout.
#[derive(Debug, Default)]
pub struct CrosstermTerminal {
    last_click: Mutex<Option<(Instant, Position)>>,
}

impl CrosstermTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend over stdout, refused when stdout is not a terminal.
    pub fn open() -> Result<Self> {
        require_tty(stdout().is_tty())?;
        Ok(Self::new())
    }

    /// Promote a left press to a double click when it repeats quickly.
    fn detect_double_click(&self, mut mouse: MouseEvent) -> MouseEvent {
        if !mouse.is_left_click() {
            return mouse;
        }
        let now = Instant::now();
        let mut last = self.last_click.lock().unwrap_or_else(|e| e.into_inner());
        let repeated = matches!(*last, Some((at, pos))
            if pos == mouse.position && now.duration_since(at) <= DOUBLE_CLICK_WINDOW);
        if repeated {
            mouse.kind = MouseKind::DoubleClicked;
            *last = None;
        } else {
            *last = Some((now, mouse.position));
        }
        mouse
    }
}

impl Terminal for CrosstermTerminal {
    fn size(&self) -> io::Result<Position> {
        let (cols, rows) = ct_terminal::size()?;
        Ok(Position::new(cols as i32, rows as i32))
    }

    fn set_size(&self, cols: i32, rows: i32) -> io::Result<()> {
        let cols = u16::try_from(cols).map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;
        let rows = u16::try_from(rows).map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;
        execute!(stdout(), SetSize(cols, rows))
    }

    fn read_event(&self) -> io::Result<Option<InputEvent>> {
        let event = match ct_event::read()? {
            CrosstermEvent::Mouse(mouse) => {
                InputEvent::Mouse(self.detect_double_click(convert_mouse_event(mouse)))
            }
            CrosstermEvent::Key(key) => InputEvent::Key(convert_key_event(key)),
            CrosstermEvent::Resize(cols, rows) => {
                InputEvent::Resize(Position::new(cols as i32, rows as i32))
            }
            _ => InputEvent::Invalid,
        };
        Ok(Some(event))
    }

    fn write_at(&self, pos: Position, text: &str) -> io::Result<()> {
        if pos.is_invalid() || pos.col > u16::MAX as i32 || pos.row > u16::MAX as i32 {
            return Ok(());
        }
        let mut out = stdout().lock();
        queue!(out, MoveTo(pos.col as u16, pos.row as u16))?;
        out.write_all(text.as_bytes())
    }

    fn flush(&self) -> io::Result<()> {
        stdout().lock().flush()
    }

    fn set_cursor_position(&self, pos: Position) -> io::Result<()> {
        if pos.is_invalid() {
            return Ok(());
        }
        execute!(stdout(), MoveTo(pos.col.min(u16::MAX as i32) as u16, pos.row.min(u16::MAX as i32) as u16))
    }

    fn set_cursor_visible(&self, visible: bool) -> io::Result<()> {
        if visible {
            execute!(stdout(), Show)
        } else {
            execute!(stdout(), Hide)
        }
    }

    fn clear(&self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All), MoveTo(0, 0))
    }

    fn discard_input(&self) -> io::Result<()> {
        while ct_event::poll(Duration::ZERO)? {
            ct_event::read()?;
        }
        Ok(())
    }

    fn enter(&self) -> io::Result<()> {
        ct_terminal::enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, EnableMouseCapture, Clear(ClearType::All))
    }

    fn leave(&self) -> io::Result<()> {
        execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, Show)?;
        ct_terminal::disable_raw_mode()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> CrosstermMouseEvent {
        CrosstermMouseEvent {
            kind,
            column,
            row,
            modifiers: CrosstermModifiers::empty(),
        }
    }

    fn key(code: KeyCode, kind: KeyEventKind) -> CrosstermKeyEvent {
        CrosstermKeyEvent {
            code,
            modifiers: CrosstermModifiers::empty(),
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_convert_left_down() {
        let event = convert_mouse_event(mouse(MouseEventKind::Down(CrosstermMouseButton::Left), 10, 5));
        assert_eq!(event.kind, MouseKind::Clicked);
        assert!(event.left_click);
        assert!(!event.right_click);
        assert_eq!(event.position, Position::new(10, 5));
    }

    #[test]
    fn test_convert_release_holds_no_button() {
        let event = convert_mouse_event(mouse(MouseEventKind::Up(CrosstermMouseButton::Left), 1, 1));
        assert_eq!(event.kind, MouseKind::Clicked);
        assert!(!event.left_click);
        assert!(!event.is_left_click());
    }

    #[test]
    fn test_convert_scroll_directions() {
        let directions = [
            (MouseEventKind::ScrollUp, MouseKind::WheeledForward),
            (MouseEventKind::ScrollDown, MouseKind::WheeledBackward),
            (MouseEventKind::ScrollLeft, MouseKind::WheeledLeft),
            (MouseEventKind::ScrollRight, MouseKind::WheeledRight),
        ];
        for (kind, expected) in directions {
            assert_eq!(convert_mouse_event(mouse(kind, 0, 0)).kind, expected);
        }
    }

    #[test]
    fn test_convert_drag_is_move_with_button() {
        let event = convert_mouse_event(mouse(MouseEventKind::Drag(CrosstermMouseButton::Left), 3, 3));
        assert_eq!(event.kind, MouseKind::Moved);
        assert!(event.left_click);
    }

    #[test]
    fn test_convert_keys() {
        assert_eq!(convert_key_event(key(KeyCode::Char('a'), KeyEventKind::Press)).character, 'a');
        assert_eq!(convert_key_event(key(KeyCode::Enter, KeyEventKind::Press)).character, KEY_ENTER);
        assert!(convert_key_event(key(KeyCode::Backspace, KeyEventKind::Press)).is_backspace());
        assert_eq!(convert_key_event(key(KeyCode::Up, KeyEventKind::Press)).character, '\0');
        assert!(!convert_key_event(key(KeyCode::Char('a'), KeyEventKind::Release)).key_down);
    }

    #[test]
    fn test_convert_modifiers() {
        let mut event = key(KeyCode::Char('x'), KeyEventKind::Press);
        event.modifiers = CrosstermModifiers::CONTROL | CrosstermModifiers::SHIFT;
        event.state = KeyEventState::CAPS_LOCK;
        let converted = convert_key_event(event);
        assert!(converted.modifiers.contains(KeyModifiers::CTRL));
        assert!(converted.modifiers.contains(KeyModifiers::SHIFT));
        assert!(converted.modifiers.contains(KeyModifiers::CAPSLOCK));
        assert!(!converted.modifiers.contains(KeyModifiers::ALT));
    }

    #[test]
    fn test_non_tty_stdout_is_unavailable() {
        assert!(require_tty(true).is_ok());
        let err = require_tty(false).unwrap_err();
        assert!(matches!(err, Error::DeviceUnavailable(_)));
        assert_eq!(err.to_string(), "device unavailable: stdout is not a terminal");
    }

    #[test]
    fn test_double_click_detection() {
        let term = CrosstermTerminal::new();
        let pos = Position::new(2, 2);
        assert_eq!(term.detect_double_click(MouseEvent::click(pos)).kind, MouseKind::Clicked);
        assert_eq!(term.detect_double_click(MouseEvent::click(pos)).kind, MouseKind::DoubleClicked);
        assert_eq!(term.detect_double_click(MouseEvent::click(pos)).kind, MouseKind::Clicked);
        assert_eq!(
            term.detect_double_click(MouseEvent::click(Position::new(3, 2))).kind,
            MouseKind::Clicked
        );
    }
}
