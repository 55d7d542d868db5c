//! Menu Module - modal input loops and their manager
//!
//! - **Menu** - a root [`VerticalContainer`](crate::layout::VerticalContainer)
//!   plus the loop that feeds it mouse input
//! - **MenuManager** - the stack of entered menus, console setup and
//!   teardown, and the auto-print thread
//! - **MenuAction** - what a dispatch reply asks the menu to do
//!
//! # Threads
//!
//! Input dispatch runs on the thread that called [`Menu::enter`]. The
//! auto-print thread repaints the top menu at its frame rate and skips a
//! frame whenever the menu's root is locked by a dispatch. Widget handlers
//! run with the root locked: they return `Reply::Refresh` to repaint rather
//! than calling [`Menu::print`].
//!
//! # Example
//!
//! ```no_run
//! use boxterm::config::ToolkitConfig;
//! use boxterm::device::{Console, CrosstermTerminal};
//! use boxterm::menu::{Menu, MenuManager};
//! use boxterm::widget::ExitButton;
//!
//! let console = Console::new(Box::new(CrosstermTerminal::new()));
//! let manager = MenuManager::new(console, &ToolkitConfig::default());
//! let menu = Menu::new(&manager);
//! menu.insert(ExitButton::new(8, 3, "Quit"));
//! menu.enter();
//! ```

mod actions;
#[allow(clippy::module_inception)]
mod menu;
mod manager;

pub use actions::MenuAction;
pub use manager::{AutoPrintState, MenuManager};
pub use menu::Menu;
