//! MenuManager - the stack of active menus and the auto-print thread.
//!
//! Every [`Menu::enter`] pushes onto the stack and pops on return; the top
//! of the stack is the menu receiving input. After each push or pop the
//! manager reconciles:
//!
//! - empty stack: stop the auto-print thread, restore the console
//! - top menu without auto-print: pause the thread
//! - otherwise: run the thread at the top menu's frame rate
//!
//! # Auto-print thread
//!
//! ```text
//! Inactive --start--> Paused <--request--> Active
//!     ^                  |                   |
//!     +-------stop-------+-------stop--------+
//! ```
//!
//! Requests are a condvar handshake: the requester sets the target state
//! and waits until the thread reports it has switched. Frames are painted
//! with `try_lock` on both the stack and the menu root, so a frame is
//! dropped rather than blocking the dispatch thread.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, TryLockError, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::{MINIMUM_FRAME_RATE, MenuOptions, ToolkitConfig};
use crate::device::Console;
use crate::error::Result;

use super::Menu;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// State of the auto-print thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoPrintState {
    /// No thread.
    #[default]
    Inactive,
    /// Printing at the scheduled interval.
    Active,
    /// Thread alive, not printing.
    Paused,
}

#[derive(Debug)]
struct Schedule {
    /// State asked for by the manager.
    target: AutoPrintState,
    /// State the thread is in.
    current: AutoPrintState,
    interval: Duration,
    /// Bumped on every interval change so a sleeping thread reschedules.
    generation: u64,
}

type Control = Arc<(Mutex<Schedule>, Condvar)>;

// =============================================================================
// MENU MANAGER
// =============================================================================

pub struct MenuManager {
    console: Arc<Console>,
    stack: Mutex<Vec<Menu>>,
    control: Control,
    thread: Mutex<Option<JoinHandle<()>>>,
    console_entered: AtomicBool,
    default_frame_rate: AtomicI32,
    minimum_frame_rate: i32,
    live_frame_rate: Arc<AtomicI32>,
    menu_defaults: MenuOptions,
    this: Weak<MenuManager>,
}

impl MenuManager {
    pub fn new(console: Arc<Console>, config: &ToolkitConfig) -> Arc<Self> {
        let minimum_frame_rate = config.minimum_frame_rate.max(MINIMUM_FRAME_RATE);
        Arc::new_cyclic(|this| Self {
            console,
            stack: Mutex::new(Vec::new()),
            control: Arc::new((
                Mutex::new(Schedule {
                    target: AutoPrintState::Inactive,
                    current: AutoPrintState::Inactive,
                    interval: Duration::ZERO,
                    generation: 0,
                }),
                Condvar::new(),
            )),
            thread: Mutex::new(None),
            console_entered: AtomicBool::new(false),
            default_frame_rate: AtomicI32::new(config.default_frame_rate.max(minimum_frame_rate)),
            minimum_frame_rate,
            live_frame_rate: Arc::new(AtomicI32::new(-1)),
            menu_defaults: config.menu,
            this: this.clone(),
        })
    }

    pub fn console(&self) -> &Arc<Console> {
        &self.console
    }

    /// Options given to menus created with this manager.
    pub fn menu_defaults(&self) -> MenuOptions {
        self.menu_defaults
    }

    // -------------------------------------------------------------------------
    // Stack
    // -------------------------------------------------------------------------

    pub(crate) fn push_menu(&self, menu: Menu) {
        lock(&self.stack).push(menu);
        self.update();
    }

    pub(crate) fn pop_menu(&self) {
        lock(&self.stack).pop();
        self.update();
    }

    /// The menu receiving input, if any.
    pub fn active_menu(&self) -> Option<Menu> {
        lock(&self.stack).last().cloned()
    }

    pub fn stack_depth(&self) -> usize {
        lock(&self.stack).len()
    }

    // -------------------------------------------------------------------------
    // Frame rate
    // -------------------------------------------------------------------------

    /// Rate for menus asking for the default. Floored at the minimum.
    pub fn set_default_frame_rate(&self, rate: i32) {
        self.default_frame_rate
            .store(rate.max(self.minimum_frame_rate), Ordering::SeqCst);
        self.update();
    }

    pub fn default_frame_rate(&self) -> i32 {
        self.default_frame_rate.load(Ordering::SeqCst)
    }

    pub fn minimum_frame_rate(&self) -> i32 {
        self.minimum_frame_rate
    }

    /// Frames actually painted during the last full second, or -1 when the
    /// thread is not printing.
    pub fn live_frame_rate(&self) -> i32 {
        self.live_frame_rate.load(Ordering::SeqCst)
    }

    /// The counter behind [`MenuManager::live_frame_rate`], for binding to a
    /// `LiveTextBox`.
    pub fn live_frame_rate_binding(&self) -> Arc<AtomicI32> {
        Arc::clone(&self.live_frame_rate)
    }

    pub fn auto_print_state(&self) -> AutoPrintState {
        lock(&self.control.0).current
    }

    fn effective_rate(&self, requested: i32) -> i32 {
        let rate = if requested < 0 {
            self.default_frame_rate()
        } else {
            requested
        };
        rate.max(self.minimum_frame_rate)
    }

    // -------------------------------------------------------------------------
    // Reconcile
    // -------------------------------------------------------------------------

    /// Bring the console and auto-print thread in line with the top menu.
    pub fn update(&self) {
        let top = self.active_menu();
        let Some(top) = top else {
            self.stop_thread();
            if self.console_entered.swap(false, Ordering::SeqCst) {
                if let Err(e) = self.console.restore() {
                    tracing::warn!("console restore failed: {}", e);
                }
            }
            return;
        };

        if !self.console_entered.swap(true, Ordering::SeqCst) {
            if let Err(e) = self.console.initialize() {
                tracing::warn!("console initialize failed: {}", e);
            }
        }

        if let Err(e) = self.ensure_thread() {
            tracing::warn!("auto-print thread failed to start: {}", e);
            return;
        }

        let options = top.options();
        if !options.use_auto_print {
            self.request(AutoPrintState::Paused, None);
            return;
        }
        let rate = self.effective_rate(options.frame_rate);
        let interval = Duration::from_millis(1000 / rate.max(1) as u64);
        tracing::debug!(rate, "auto-print scheduled");
        self.request(AutoPrintState::Active, Some(interval));
    }

    /// Set the target state and wait for the thread to take it up.
    fn request(&self, target: AutoPrintState, interval: Option<Duration>) {
        let from_thread = self.on_auto_print_thread();
        let (mutex, cvar) = &*self.control;
        let mut schedule = lock(mutex);
        if let Some(interval) = interval {
            if schedule.interval != interval {
                schedule.interval = interval;
                schedule.generation += 1;
            }
        }
        schedule.target = target;
        cvar.notify_all();
        if from_thread {
            return;
        }
        let _schedule = cvar
            .wait_while(schedule, |s| s.current != s.target && s.current != AutoPrintState::Inactive)
            .unwrap_or_else(|e| e.into_inner());
    }

    fn ensure_thread(&self) -> Result<()> {
        let mut slot = lock(&self.thread);
        if slot.is_some() {
            return Ok(());
        }
        {
            let mut schedule = lock(&self.control.0);
            schedule.target = AutoPrintState::Paused;
            schedule.current = AutoPrintState::Paused;
        }
        let manager = self.this.clone();
        let control = Arc::clone(&self.control);
        let live = Arc::clone(&self.live_frame_rate);
        let handle = thread::Builder::new()
            .name("boxterm-autoprint".to_string())
            .spawn(move || auto_print_loop(manager, control, live))?;
        tracing::debug!("auto-print thread started");
        *slot = Some(handle);
        Ok(())
    }

    fn stop_thread(&self) {
        let handle = lock(&self.thread).take();
        {
            let (mutex, cvar) = &*self.control;
            let mut schedule = lock(mutex);
            schedule.target = AutoPrintState::Inactive;
            cvar.notify_all();
        }
        if let Some(handle) = handle {
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
            tracing::debug!("auto-print thread stopped");
        }
        lock(&self.control.0).current = AutoPrintState::Inactive;
        self.live_frame_rate.store(-1, Ordering::SeqCst);
    }

    fn on_auto_print_thread(&self) -> bool {
        lock(&self.thread)
            .as_ref()
            .is_some_and(|handle| handle.thread().id() == thread::current().id())
    }

    // -------------------------------------------------------------------------
    // Printing
    // -------------------------------------------------------------------------

    /// Paint the top menu if neither the stack nor its root is busy.
    pub fn try_print_top(&self) -> bool {
        let top = match self.stack.try_lock() {
            Ok(stack) => stack.last().cloned(),
            Err(TryLockError::Poisoned(e)) => e.into_inner().last().cloned(),
            Err(TryLockError::WouldBlock) => return false,
        };
        top.is_some_and(|menu| menu.try_print())
    }

    /// Paint the top menu, waiting for it to be free.
    ///
    /// Not for use inside a widget handler; return `Reply::Refresh` there.
    pub fn refresh_menu(&self) {
        if let Some(menu) = self.active_menu() {
            menu.print();
        }
    }
}

impl Drop for MenuManager {
    fn drop(&mut self) {
        self.stop_thread();
    }
}

impl fmt::Debug for MenuManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuManager")
            .field("stack_depth", &self.stack_depth())
            .field("auto_print", &self.auto_print_state())
            .field("default_frame_rate", &self.default_frame_rate())
            .field("live_frame_rate", &self.live_frame_rate())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// AUTO-PRINT LOOP
// =============================================================================

fn auto_print_loop(manager: Weak<MenuManager>, control: Control, live: Arc<AtomicI32>) {
    let (mutex, cvar) = &*control;
    let mut frames = 0;
    let mut window_start = Instant::now();
    let mut next_frame = Instant::now();
    let mut generation = lock(mutex).generation;

    loop {
        let mut schedule = lock(mutex);
        if schedule.current != schedule.target {
            schedule.current = schedule.target;
            cvar.notify_all();
            if schedule.current == AutoPrintState::Active {
                next_frame = Instant::now();
                window_start = Instant::now();
                frames = 0;
            } else {
                live.store(-1, Ordering::SeqCst);
            }
        }

        let current = schedule.current;
        match current {
            AutoPrintState::Inactive => return,
            AutoPrintState::Paused => {
                let _schedule = cvar
                    .wait_while(schedule, |s| s.target == AutoPrintState::Paused)
                    .unwrap_or_else(|e| e.into_inner());
                continue;
            }
            AutoPrintState::Active => {
                if schedule.generation != generation {
                    generation = schedule.generation;
                    next_frame = Instant::now();
                    tracing::trace!(interval = ?schedule.interval, "auto-print rescheduled");
                }
                let wait = next_frame.saturating_duration_since(Instant::now());
                if !wait.is_zero() {
                    let (_schedule, timeout) = cvar
                        .wait_timeout_while(schedule, wait, |s| {
                            s.target == AutoPrintState::Active && s.generation == generation
                        })
                        .unwrap_or_else(|e| e.into_inner());
                    if !timeout.timed_out() {
                        continue;
                    }
                } else {
                    drop(schedule);
                }
            }
        }

        let interval = lock(mutex).interval;
        let Some(manager) = manager.upgrade() else {
            return;
        };
        if manager.try_print_top() {
            frames += 1;
        }
        drop(manager);

        next_frame += interval;
        let now = Instant::now();
        if next_frame < now {
            next_frame = now;
        }
        if now.duration_since(window_start) >= Duration::from_secs(1) {
            live.store(frames, Ordering::SeqCst);
            tracing::trace!(frames, "auto-print rate");
            frames = 0;
            window_start = now;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
