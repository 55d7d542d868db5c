//! Input Module - event model and hook chain
//!
//! Events are produced by the device adapter and consumed by menus. Hooks
//! let client code observe or veto events before widgets see them.

pub mod event;
pub mod hooks;

pub use event::{
    InputEvent, KEY_BACKSPACE, KEY_DELETE, KEY_ENTER, KEY_ESCAPE, KeyEvent, KeyModifiers,
    MouseEvent, MouseKind,
};
pub use hooks::{HookHandle, InputHook, InputHookChain, run_hooks};
