//! Input hook chain.
//!
//! An ordered set of callbacks that see every event a menu reads before any
//! widget does. The most recently added hook runs first. A hook can rewrite
//! the event in place or veto it with [`InputEvent::invalidate`], which stops
//! the chain.
//!
//! # Example
//!
//! ```
//! use boxterm::input::{InputEvent, InputHookChain, KeyEvent};
//!
//! let mut chain = InputHookChain::new();
//! let handle = chain.add_input_hook(|event: &mut InputEvent| {
//!     if event.as_key().is_some_and(|key| key.character == 'q') {
//!         event.invalidate();
//!     }
//! });
//!
//! let mut event: InputEvent = KeyEvent::press('q').into();
//! chain.start_hook_chain(&mut event);
//! assert!(event.is_invalid());
//!
//! assert!(chain.remove_input_hook(handle));
//! ```

use std::sync::Arc;

use super::event::InputEvent;

/// Shared hook callback.
pub type InputHook = Arc<dyn Fn(&mut InputEvent) + Send + Sync>;

/// Opaque handle returned by [`InputHookChain::add_input_hook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookHandle {
    slot: usize,
    generation: u64,
}

#[derive(Clone)]
struct Node {
    hook: InputHook,
    newer: Option<usize>,
    older: Option<usize>,
}

#[derive(Clone, Default)]
struct Slot {
    generation: u64,
    node: Option<Node>,
}

/// Newest-first collection of input hooks.
///
/// Hooks live in a slab threaded by a doubly linked list, so adding and
/// removing are O(1). Freed slots are reused; the slot generation keeps a
/// stale handle from removing the hook that took its place.
#[derive(Clone, Default)]
pub struct InputHookChain {
    slots: Vec<Slot>,
    free: Vec<usize>,
    newest: Option<usize>,
    len: usize,
}

impl InputHookChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hook to the front of the chain.
    pub fn add_input_hook<F>(&mut self, hook: F) -> HookHandle
    where
        F: Fn(&mut InputEvent) + Send + Sync + 'static,
    {
        let node = Node {
            hook: Arc::new(hook),
            newer: None,
            older: self.newest,
        };
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.slots.push(Slot::default());
                self.slots.len() - 1
            }
        };
        if let Some(front) = self.newest.and_then(|i| self.slots[i].node.as_mut()) {
            front.newer = Some(slot);
        }
        self.slots[slot].node = Some(node);
        self.newest = Some(slot);
        self.len += 1;
        HookHandle {
            slot,
            generation: self.slots[slot].generation,
        }
    }

    /// Remove a hook. Returns false if the handle is unknown (already
    /// removed, or from another chain).
    pub fn remove_input_hook(&mut self, handle: HookHandle) -> bool {
        let Some(entry) = self.slots.get_mut(handle.slot) else {
            return false;
        };
        if entry.generation != handle.generation {
            return false;
        }
        let Some(node) = entry.node.take() else {
            return false;
        };
        entry.generation += 1;

        match node.newer.and_then(|i| self.slots[i].node.as_mut()) {
            Some(newer) => newer.older = node.older,
            None => self.newest = node.older,
        }
        if let Some(older) = node.older.and_then(|i| self.slots[i].node.as_mut()) {
            older.newer = node.newer;
        }
        self.free.push(handle.slot);
        self.len -= 1;
        true
    }

    /// Hooks in run order, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &InputHook> {
        let mut cursor = self.newest;
        std::iter::from_fn(move || {
            let node = self.slots[cursor?].node.as_ref()?;
            cursor = node.older;
            Some(&node.hook)
        })
    }

    /// Run every hook, newest first, stopping once the event is invalid.
    pub fn start_hook_chain(&self, event: &mut InputEvent) {
        run_hooks(self.iter(), event);
    }

    /// Copy of the current hooks, in run order.
    ///
    /// Lets a caller release whatever lock guards the chain before running
    /// hooks that may themselves add or remove hooks.
    pub fn snapshot(&self) -> Vec<InputHook> {
        self.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        for (slot, entry) in self.slots.iter_mut().enumerate() {
            if entry.node.take().is_some() {
                entry.generation += 1;
                self.free.push(slot);
            }
        }
        self.newest = None;
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl std::fmt::Debug for InputHookChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputHookChain")
            .field("hooks", &self.len)
            .field("slots", &self.slots.len())
            .finish()
    }
}

/// Run hooks in order until one invalidates the event.
pub fn run_hooks<'a>(hooks: impl IntoIterator<Item = &'a InputHook>, event: &mut InputEvent) {
    for hook in hooks {
        if event.is_invalid() {
            return;
        }
        hook(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::event::KeyEvent;
    use std::sync::Mutex;

    fn recording_chain(order: &Arc<Mutex<Vec<u32>>>, ids: &[u32]) -> (InputHookChain, Vec<HookHandle>) {
        let mut chain = InputHookChain::new();
        let mut handles = Vec::new();
        for &id in ids {
            let order = order.clone();
            handles.push(chain.add_input_hook(move |_| order.lock().unwrap().push(id)));
        }
        (chain, handles)
    }

    #[test]
    fn test_newest_hook_runs_first() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let (chain, _) = recording_chain(&order, &[1, 2, 3]);

        let mut event: InputEvent = KeyEvent::press('x').into();
        chain.start_hook_chain(&mut event);

        assert_eq!(*order.lock().unwrap(), vec![3, 2, 1]);
    }

    #[test]
    fn test_remove_hook() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let (mut chain, handles) = recording_chain(&order, &[1, 2, 3]);

        assert!(chain.remove_input_hook(handles[1]));
        assert!(!chain.remove_input_hook(handles[1]));
        assert_eq!(chain.len(), 2);

        let mut event: InputEvent = KeyEvent::press('x').into();
        chain.start_hook_chain(&mut event);
        assert_eq!(*order.lock().unwrap(), vec![3, 1]);
    }

    #[test]
    fn test_veto_stops_chain() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let (mut chain, _) = recording_chain(&order, &[1]);
        chain.add_input_hook(|event| event.invalidate());

        let mut event: InputEvent = KeyEvent::press('x').into();
        chain.start_hook_chain(&mut event);

        assert!(event.is_invalid());
        assert!(order.lock().unwrap().is_empty());
    }

    #[test]
    fn test_hook_can_rewrite_event() {
        let mut chain = InputHookChain::new();
        chain.add_input_hook(|event| {
            if let InputEvent::Key(key) = event {
                key.character = key.character.to_ascii_uppercase();
            }
        });

        let mut event: InputEvent = KeyEvent::press('a').into();
        chain.start_hook_chain(&mut event);
        assert_eq!(event.as_key().map(|k| k.character), Some('A'));
    }

    #[test]
    fn test_remove_ends_and_middle_keeps_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let (mut chain, handles) = recording_chain(&order, &[1, 2, 3, 4, 5]);

        assert!(chain.remove_input_hook(handles[4]));
        assert!(chain.remove_input_hook(handles[0]));
        assert!(chain.remove_input_hook(handles[2]));

        let mut event: InputEvent = KeyEvent::press('x').into();
        chain.start_hook_chain(&mut event);
        assert_eq!(*order.lock().unwrap(), vec![4, 2]);
    }

    #[test]
    fn test_stale_handle_after_slot_reuse() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let (mut chain, handles) = recording_chain(&order, &[1, 2]);
        assert!(chain.remove_input_hook(handles[0]));

        let order_new = order.clone();
        let fresh = chain.add_input_hook(move |_| order_new.lock().unwrap().push(9));
        assert!(!chain.remove_input_hook(handles[0]));
        assert_eq!(chain.len(), 2);

        let mut event: InputEvent = KeyEvent::press('x').into();
        chain.start_hook_chain(&mut event);
        assert_eq!(*order.lock().unwrap(), vec![9, 2]);
        assert!(chain.remove_input_hook(fresh));
    }

    #[test]
    fn test_clear_then_reuse() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let (mut chain, handles) = recording_chain(&order, &[1, 2, 3]);
        chain.clear();
        assert!(chain.is_empty());
        assert!(!chain.remove_input_hook(handles[1]));

        let order_new = order.clone();
        chain.add_input_hook(move |_| order_new.lock().unwrap().push(4));
        assert_eq!(chain.snapshot().len(), 1);
    }

    #[test]
    fn test_snapshot_matches_run_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let (chain, _) = recording_chain(&order, &[7, 8]);
        let hooks = chain.snapshot();

        let mut event: InputEvent = KeyEvent::press('x').into();
        run_hooks(hooks.iter(), &mut event);
        assert_eq!(*order.lock().unwrap(), vec![8, 7]);
    }
}
