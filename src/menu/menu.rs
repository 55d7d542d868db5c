//! Menu - a root container and the modal loop that drives it.
//!
//! # Lifecycle
//!
//! ```text
//! not entered --enter()--> active --exit() / input closed--> not entered
//! ```
//!
//! [`Menu::enter`] pushes the menu on its manager's stack, optionally paints
//! once, then loops:
//!
//! 1. Read one discrete event from the console.
//! 2. Run it through the input hook chain (newest hook first; a hook may
//!    invalidate the event to veto it).
//! 3. Mouse events go to the root container.
//! 4. If a menu button was clicked, its sub-menu is entered once the root is
//!    unlocked, and the sub-menu's exit reply stands in for the click's.
//! 5. The reply is mapped through [`MenuAction`].
//!
//! `exit()` is observed at the top of the next iteration, so the loop ends
//! after the event being handled.
//!
//! # Focus
//!
//! When a dispatch leaves an entry box interacting, the menu records its
//! layer path. Until the box releases focus, raw input goes to that box
//! only: no hooks, no widget dispatch.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use crate::config::MenuOptions;
use crate::device::Console;
use crate::input::{HookHandle, InputEvent, InputHookChain, run_hooks};
use crate::layout::VerticalContainer;
use crate::types::{Alignment, FILL, Position, Reply};
use crate::widget::{BoxWidget, EntryTextBox, FocusOutcome, Widget};

use super::actions::MenuAction;
use super::manager::MenuManager;

/// Clonable handle to a menu. Clones share the same menu.
#[derive(Clone)]
pub struct Menu {
    inner: Arc<MenuInner>,
}

struct MenuInner {
    manager: Arc<MenuManager>,
    root: Mutex<VerticalContainer>,
    options: Mutex<MenuOptions>,
    hooks: Mutex<InputHookChain>,
    focus: Mutex<Option<Vec<i32>>>,
    exit_requested: AtomicBool,
    exit_reply: Mutex<Reply>,
    depth: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl Menu {
    /// A menu whose root fills the window, with the manager's default options.
    pub fn new(manager: &Arc<MenuManager>) -> Self {
        Self {
            inner: Arc::new(MenuInner {
                manager: Arc::clone(manager),
                root: Mutex::new(VerticalContainer::new(FILL, FILL)),
                options: Mutex::new(manager.menu_defaults()),
                hooks: Mutex::new(InputHookChain::new()),
                focus: Mutex::new(None),
                exit_requested: AtomicBool::new(false),
                exit_reply: Mutex::new(Reply::Continue),
                depth: AtomicUsize::new(0),
            }),
        }
    }

    pub fn manager(&self) -> &Arc<MenuManager> {
        &self.inner.manager
    }

    pub fn console(&self) -> &Arc<Console> {
        self.inner.manager.console()
    }

    /// True if both handles refer to the same menu.
    pub fn ptr_eq(&self, other: &Menu) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // -------------------------------------------------------------------------
    // Contents
    // -------------------------------------------------------------------------

    pub fn insert(&self, widget: impl Into<Widget>) -> i32 {
        lock(&self.inner.root).insert(widget)
    }

    pub fn insert_at(&self, layer: i32, widget: impl Into<Widget>) {
        lock(&self.inner.root).insert_at(layer, widget);
    }

    pub fn insert_fixed(&self, layer: i32, widget: impl Into<Widget>, offset: Position) {
        lock(&self.inner.root).insert_fixed(layer, widget, offset);
    }

    pub fn remove(&self, layer: i32) -> Option<Widget> {
        lock(&self.inner.root).remove(layer)
    }

    /// Run `f` with the root container locked.
    ///
    /// Must not be called from a widget handler of this menu; the root is
    /// already locked during dispatch.
    pub fn with_container<R>(&self, f: impl FnOnce(&mut VerticalContainer) -> R) -> R {
        f(&mut lock(&self.inner.root))
    }

    pub fn set_alignment(&self, alignment: Alignment) {
        lock(&self.inner.root).set_alignment(alignment);
    }

    // -------------------------------------------------------------------------
    // Options and state
    // -------------------------------------------------------------------------

    pub fn options(&self) -> MenuOptions {
        *lock(&self.inner.options)
    }

    /// Replace the options. An active menu reschedules auto-print at once.
    pub fn set_options(&self, options: MenuOptions) {
        *lock(&self.inner.options) = options;
        if self.is_entered() {
            self.inner.manager.update();
        }
    }

    /// Reply returned by [`Menu::enter`]. Defaults to `Continue`.
    pub fn set_exit_reply(&self, reply: Reply) {
        *lock(&self.inner.exit_reply) = reply;
    }

    pub fn exit_reply(&self) -> Reply {
        *lock(&self.inner.exit_reply)
    }

    /// Ask the loop to stop after the current event.
    pub fn exit(&self) {
        self.inner.exit_requested.store(true, Ordering::SeqCst);
    }

    pub fn is_entered(&self) -> bool {
        self.inner.depth.load(Ordering::SeqCst) > 0
    }

    /// Layer path of the entry box holding focus, if any.
    pub fn focused_path(&self) -> Option<Vec<i32>> {
        lock(&self.inner.focus).clone()
    }

    /// Forwarded to the console.
    pub fn set_screen_dimensions(&self, width: i32, height: i32) -> bool {
        self.console().set_window_dimensions(width, height)
    }

    // -------------------------------------------------------------------------
    // Hooks
    // -------------------------------------------------------------------------

    /// Add a hook that runs before any hook added earlier.
    pub fn add_input_hook<F>(&self, hook: F) -> HookHandle
    where
        F: Fn(&mut InputEvent) + Send + Sync + 'static,
    {
        lock(&self.inner.hooks).add_input_hook(hook)
    }

    pub fn remove_input_hook(&self, handle: HookHandle) -> bool {
        lock(&self.inner.hooks).remove_input_hook(handle)
    }

    // -------------------------------------------------------------------------
    // Painting
    // -------------------------------------------------------------------------

    /// Paint the whole menu, waiting for the root if it is busy.
    ///
    /// Widget handlers of this menu should return `Reply::Refresh` instead
    /// of calling this; the root is locked during dispatch.
    pub fn print(&self) {
        let root = lock(&self.inner.root);
        self.paint(root);
    }

    /// Paint only if the root is free. Returns whether a frame was painted.
    pub fn try_print(&self) -> bool {
        match self.inner.root.try_lock() {
            Ok(root) => {
                self.paint(root);
                true
            }
            Err(TryLockError::Poisoned(e)) => {
                self.paint(e.into_inner());
                true
            }
            Err(TryLockError::WouldBlock) => false,
        }
    }

    fn paint(&self, mut root: MutexGuard<'_, VerticalContainer>) {
        let options = self.options();
        let console = self.console();
        root.set_transparent(options.background_transparent);
        let window = console.window_boundary();
        if options.use_buffering {
            root.buffer(console, Position::default(), window);
            console.print_write_buffer();
        } else {
            root.draw(console, Position::default(), window);
        }
    }

    // -------------------------------------------------------------------------
    // Modal loop
    // -------------------------------------------------------------------------

    /// Run the modal loop until `exit()` is requested or input closes.
    /// Returns the exit reply.
    pub fn enter(&self) -> Reply {
        let inner = &self.inner;
        inner.exit_requested.store(false, Ordering::SeqCst);
        inner.depth.fetch_add(1, Ordering::SeqCst);
        inner.manager.push_menu(self.clone());

        if self.options().print_on_enter {
            self.print();
        }
        self.entry_loop();

        // A nested entry of this same menu must not end the outer one.
        inner.exit_requested.store(false, Ordering::SeqCst);
        *lock(&inner.focus) = None;
        inner.manager.pop_menu();
        inner.depth.fetch_sub(1, Ordering::SeqCst);
        let reply = self.exit_reply();
        tracing::debug!(?reply, "menu left");
        reply
    }

    fn entry_loop(&self) {
        let console = Arc::clone(self.console());
        while !self.inner.exit_requested.load(Ordering::SeqCst) {
            if let Some(path) = self.focused_path() {
                let event = console.get_button_input();
                if event.is_invalid() && console.input_closed() {
                    break;
                }
                self.feed_focus(&path, &event);
                continue;
            }

            let mut event = console.get_button_input();
            if event.is_invalid() && console.input_closed() {
                tracing::debug!("input closed, leaving menu");
                break;
            }

            let hooks = lock(&self.inner.hooks).snapshot();
            run_hooks(&hooks, &mut event);
            let InputEvent::Mouse(mouse) = event else {
                continue;
            };

            let (mut reply, focus, sub_menu) = {
                let mut root = lock(&self.inner.root);
                let reply = root.interact(&console, &mouse);
                (reply, root.focused_path(), root.take_pending_menu())
            };

            if let Some(sub_menu) = sub_menu {
                tracing::debug!(reentry = sub_menu.ptr_eq(self), "entering sub-menu");
                reply = sub_menu.enter();
            }

            if let Some(path) = focus {
                tracing::debug!(?path, "entry box took focus");
                let refresh = self.with_focused(&path, |entry| entry.auto_menu_refresh()).unwrap_or(false);
                *lock(&self.inner.focus) = Some(path);
                if refresh {
                    self.print();
                }
            }

            if let Some(action) = MenuAction::for_reply(reply) {
                action.execute(self);
            }
        }
    }

    fn feed_focus(&self, path: &[i32], event: &InputEvent) {
        let fed = self.with_focused(path, |entry| (entry.handle_focus_input(event), entry.auto_menu_refresh()));
        let Some((outcome, refresh)) = fed else {
            // Widget removed while focused.
            *lock(&self.inner.focus) = None;
            return;
        };
        if outcome == FocusOutcome::Released {
            *lock(&self.inner.focus) = None;
        }
        if refresh && outcome != FocusOutcome::Ignored {
            self.print();
        }
    }

    fn with_focused<R>(&self, path: &[i32], f: impl FnOnce(&mut EntryTextBox) -> R) -> Option<R> {
        let (&first, rest) = path.split_first()?;
        let mut root = lock(&self.inner.root);
        let entry = root.get_mut(first)?.descend_mut(rest)?.as_entry_mut()?;
        Some(f(entry))
    }
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu")
            .field("options", &self.options())
            .field("entered", &self.is_entered())
            .field("exit_reply", &self.exit_reply())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================
