//! # boxterm
//!
//! Box-model console GUI toolkit: nested containers, mouse-driven widgets
//! and modal menus on a character grid.
//!
//! ## Architecture
//!
//! Every widget owns a [`widget::Frame`]: a target size, borders, an
//! alignment and the placement computed at its last paint. Containers own
//! their children in layer order and place them along one axis, so a screen
//! is a tree rooted in a menu's vertical container:
//!
//! ```text
//! Menu::enter -> Console input -> hooks -> root.interact -> Reply -> MenuAction
//!                                                  |
//! auto-print thread ---------------------> root.buffer -> write buffer -> Terminal
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Positions, boundaries, alignment, replies
//! - [`device`] - Console adapter and terminal backends
//! - [`input`] - Input records and hook chains
//! - [`widget`] - Frame, text boxes, buttons, entry boxes, graphics
//! - [`layout`] - Box containers and gap distribution
//! - [`menu`] - Modal menus and the menu manager
//! - [`config`] - TOML configuration
//! - [`logging`] - File-backed tracing setup

pub mod config;
pub mod device;
pub mod error;
pub mod input;
pub mod layout;
pub mod logging;
pub mod menu;
pub mod types;
pub mod widget;

// Re-export commonly used items
pub use types::*;

pub use error::{Error, Result};

pub use config::{MenuOptions, ToolkitConfig};

pub use device::{Console, CrosstermTerminal, MemoryTerminal, Terminal};

pub use input::{HookHandle, InputEvent, KeyEvent, MouseEvent};

pub use layout::{HorizontalContainer, VerticalContainer};

pub use menu::{AutoPrintState, Menu, MenuManager};

pub use widget::{
    BoxWidget, Button, EntryTextBox, ExitButton, Graphic, LiveTextBox, MenuButton, ScrollingTextBox, Spacer,
    TextBox, Widget,
};
