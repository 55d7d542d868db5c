//! Reply -> menu action lookup.
//!
//! After a mouse event is dispatched, the root container's reply is looked
//! up here. Replies with no action (`Continue`, `Ignored`, `Failed`,
//! `Repeat`) leave the menu untouched.

use crate::types::Reply;

use super::Menu;

/// Something a reply asks the menu to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Leave the modal loop at the top of the next iteration.
    Exit,
    /// Repaint the whole menu now.
    Refresh,
}

impl MenuAction {
    pub fn for_reply(reply: Reply) -> Option<Self> {
        match reply {
            Reply::Exit => Some(MenuAction::Exit),
            Reply::Refresh => Some(MenuAction::Refresh),
            Reply::Ignored | Reply::Continue | Reply::Repeat | Reply::Failed => None,
        }
    }

    pub fn execute(self, menu: &Menu) {
        tracing::trace!(action = ?self, "menu action");
        match self {
            MenuAction::Exit => menu.exit(),
            MenuAction::Refresh => menu.print(),
        }
    }
}
