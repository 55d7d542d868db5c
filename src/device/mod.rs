//! Device Module - the terminal behind the toolkit
//!
//! The layout and menu code never touches a terminal directly. It talks to a
//! [`Console`], which owns a [`Terminal`] backend plus the state the toolkit
//! keeps on the device side: the write buffer, the logical cursor and the
//! resize watcher.
//!
//! # Backends
//!
//! - [`CrosstermTerminal`] - real terminal through crossterm
//! - [`MemoryTerminal`] - character grid with a scripted input queue
//!
//! # Example
//!
//! ```
//! use boxterm::device::{Console, MemoryTerminal};
//! use boxterm::Position;
//!
//! let terminal = MemoryTerminal::new(20, 5);
//! let console = Console::new(Box::new(terminal.clone()));
//!
//! console.write_to_screen(Position::new(2, 1), "hi");
//! assert_eq!(terminal.row(1), "  hi                ");
//! ```

use std::io;

use crate::input::InputEvent;
use crate::types::Position;

pub mod buffer;
pub mod console;
pub mod crossterm_backend;
pub mod memory;

pub use buffer::WriteBuffer;
pub use console::{Console, ResizeHandler};
pub use crossterm_backend::CrosstermTerminal;
pub use memory::MemoryTerminal;

// =============================================================================
// TERMINAL
// =============================================================================

/// Backend seam for the console.
///
/// Methods take `&self`: input is read on the dispatch thread while the
/// auto-print thread writes, so implementations synchronise internally and
/// must not hold an output lock while blocked on input.
pub trait Terminal: Send + Sync {
    /// Window size in cells, as `(columns, rows)` in a `Position`.
    fn size(&self) -> io::Result<Position>;

    /// Ask the host to resize the window.
    fn set_size(&self, cols: i32, rows: i32) -> io::Result<()>;

    /// Allow or forbid user resizing. Hosts without the capability ignore it.
    fn allow_resize(&self, _allow: bool) -> io::Result<()> {
        Ok(())
    }

    /// Enable or disable the maximize control. Hosts without one ignore it.
    fn allow_maximize(&self, _allow: bool) -> io::Result<()> {
        Ok(())
    }

    /// Block until the next input record. `Ok(None)` means input is closed.
    fn read_event(&self) -> io::Result<Option<InputEvent>>;

    /// Write text at a cell. May be buffered until [`Terminal::flush`].
    fn write_at(&self, pos: Position, text: &str) -> io::Result<()>;

    fn flush(&self) -> io::Result<()>;

    fn set_cursor_position(&self, pos: Position) -> io::Result<()>;

    fn set_cursor_visible(&self, visible: bool) -> io::Result<()>;

    /// Blank the whole screen and home the cursor.
    fn clear(&self) -> io::Result<()>;

    /// Drop any input that has not been read yet.
    fn discard_input(&self) -> io::Result<()>;

    /// Switch into interactive mode (raw input, mouse reporting).
    fn enter(&self) -> io::Result<()> {
        Ok(())
    }

    /// Undo [`Terminal::enter`].
    fn leave(&self) -> io::Result<()> {
        Ok(())
    }
}
