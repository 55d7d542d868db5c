//! Console - the device adapter.
//!
//! Wraps a [`Terminal`] backend and adds the device-side state the toolkit
//! shares between threads: the off-screen write buffer, the logical cursor,
//! the input-closed flag and the resize watcher.
//!
//! Device failures never propagate out of the painting and input calls. They
//! are logged and reported as sentinels: [`INVALID_POSITION`] for size
//! queries, [`InputEvent::Invalid`] for reads, `false` for setters.
//!
//! # Threads
//!
//! The dispatch thread blocks in [`Console::get_button_input`] while the
//! auto-print thread paints through [`Console::write_to_buffer`] and
//! [`Console::print_write_buffer`]. The write buffer has its own mutex and
//! the flush holds it for the whole copy.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::Terminal;
use super::buffer::WriteBuffer;
use crate::config::ToolkitConfig;
use crate::error::Result;
use crate::input::{InputEvent, MouseKind};
use crate::types::{Boundary, DrawMode, INVALID_POSITION, Position};

/// Callback run by the resize watcher after the write buffer is reformatted.
pub type ResizeHandler = Arc<dyn Fn() + Send + Sync>;

// =============================================================================
// CONSOLE
// =============================================================================

pub struct Console {
    terminal: Box<dyn Terminal>,
    write_buffer: Mutex<WriteBuffer>,
    cursor: Mutex<Position>,
    input_closed: AtomicBool,
    resize_handler: Mutex<Option<ResizeHandler>>,
    resize_watcher: Mutex<Option<ResizeWatcher>>,
    resize_poll_interval: Duration,
}

impl Console {
    /// Wrap a backend with the default configuration.
    pub fn new(terminal: Box<dyn Terminal>) -> Arc<Self> {
        Self::with_config(terminal, &ToolkitConfig::default())
    }

    pub fn with_config(terminal: Box<dyn Terminal>, config: &ToolkitConfig) -> Arc<Self> {
        let console = Arc::new(Self {
            terminal,
            write_buffer: Mutex::new(WriteBuffer::default()),
            cursor: Mutex::new(Position::default()),
            input_closed: AtomicBool::new(false),
            resize_handler: Mutex::new(None),
            resize_watcher: Mutex::new(None),
            resize_poll_interval: config.resize_poll_interval(),
        });
        console.format_write_buffer();
        console
    }

    fn buffer(&self) -> MutexGuard<'_, WriteBuffer> {
        self.write_buffer.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Switch the terminal into interactive mode and size the write buffer.
    pub fn initialize(&self) -> Result<()> {
        self.terminal.enter()?;
        self.format_write_buffer();
        tracing::debug!("console initialized");
        Ok(())
    }

    /// Leave interactive mode.
    pub fn restore(&self) -> Result<()> {
        self.stop_resize_watcher();
        self.terminal.leave()?;
        tracing::debug!("console restored");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Window
    // -------------------------------------------------------------------------

    /// Window size as `(columns, rows)`; `{-1,-1}` if the query fails.
    pub fn window_dimensions(&self) -> Position {
        match self.terminal.size() {
            Ok(dim) => dim,
            Err(e) => {
                tracing::warn!("window size query failed: {}", e);
                INVALID_POSITION
            }
        }
    }

    pub fn window_width(&self) -> i32 {
        self.window_dimensions().col
    }

    pub fn window_height(&self) -> i32 {
        self.window_dimensions().row
    }

    /// Inclusive boundary covering the window. Empty if the size is unknown.
    pub fn window_boundary(&self) -> Boundary {
        let dim = self.window_dimensions();
        if dim.is_invalid() {
            return Boundary::new(0, 0, -1, -1);
        }
        Boundary::new(0, 0, dim.col - 1, dim.row - 1)
    }

    pub fn set_window_dimensions(&self, cols: i32, rows: i32) -> bool {
        let ok = self.report("set window size", self.terminal.set_size(cols, rows));
        if ok {
            self.format_write_buffer();
        }
        ok
    }

    pub fn allow_resize(&self, allow: bool) -> bool {
        self.report("allow resize", self.terminal.allow_resize(allow))
    }

    pub fn allow_maximize(&self, allow: bool) -> bool {
        self.report("allow maximize", self.terminal.allow_maximize(allow))
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Block for the next discrete event. Pointer moves with no button held
    /// are skipped.
    pub fn get_button_input(&self) -> InputEvent {
        loop {
            let event = self.get_raw_input();
            if let InputEvent::Mouse(mouse) = &event {
                if mouse.kind == MouseKind::Moved && !mouse.left_click && !mouse.right_click {
                    continue;
                }
            }
            return event;
        }
    }

    /// Block for the next event of any kind.
    ///
    /// Returns `Invalid` once the device reports its input closed (or a read
    /// fails); every later call returns `Invalid` immediately.
    pub fn get_raw_input(&self) -> InputEvent {
        if self.input_closed() {
            return InputEvent::Invalid;
        }
        loop {
            match self.terminal.read_event() {
                Ok(Some(InputEvent::Invalid)) => continue,
                Ok(Some(event)) => {
                    if let InputEvent::Resize(_) = event {
                        self.format_write_buffer();
                    }
                    return event;
                }
                Ok(None) => {
                    tracing::debug!("console input closed");
                    self.input_closed.store(true, Ordering::SeqCst);
                    return InputEvent::Invalid;
                }
                Err(e) => {
                    tracing::warn!("input read failed, closing input: {}", e);
                    self.input_closed.store(true, Ordering::SeqCst);
                    return InputEvent::Invalid;
                }
            }
        }
    }

    /// True once the device has no more input to deliver.
    pub fn input_closed(&self) -> bool {
        self.input_closed.load(Ordering::SeqCst)
    }

    pub fn clear_input_buffer(&self) -> bool {
        self.report("discard input", self.terminal.discard_input())
    }

    // -------------------------------------------------------------------------
    // Output
    // -------------------------------------------------------------------------

    /// Immediate write; the cursor is left where it was.
    pub fn write_to_screen(&self, pos: Position, text: &str) {
        self.buffer().invalidate();
        let cursor = self.cursor_position();
        let result = self
            .terminal
            .write_at(pos, text)
            .and_then(|_| self.terminal.set_cursor_position(cursor))
            .and_then(|_| self.terminal.flush());
        self.report("screen write", result);
    }

    /// Deferred write into the off-screen buffer, clipped to its bounds.
    pub fn write_to_buffer(&self, pos: Position, text: &str) {
        self.buffer().write(pos, text);
    }

    /// Route a write by draw mode.
    #[inline]
    pub fn write(&self, mode: DrawMode, pos: Position, text: &str) {
        match mode {
            DrawMode::Draw => self.write_to_screen(pos, text),
            DrawMode::Buffer => self.write_to_buffer(pos, text),
        }
    }

    /// Copy the write buffer to the screen in one batch.
    ///
    /// Only rows changed since the previous flush are sent.
    pub fn print_write_buffer(&self) {
        let mut buffer = self.buffer();
        let rows = buffer.take_dirty_rows();
        if rows.is_empty() {
            return;
        }

        let cursor = self.cursor_position();
        let mut result = Ok(());
        for (row, text) in &rows {
            result = self.terminal.write_at(Position::new(0, *row as i32), text);
            if result.is_err() {
                break;
            }
        }
        let result = result
            .and_then(|_| self.terminal.set_cursor_position(cursor))
            .and_then(|_| self.terminal.flush());
        if !self.report("buffer flush", result) {
            buffer.invalidate();
        }
        tracing::trace!(rows = rows.len(), "write buffer flushed");
    }

    /// Blank the write buffer.
    pub fn clear_write_buffer(&self) {
        self.buffer().clear();
    }

    /// Resize the write buffer to the current window and blank it.
    pub fn format_write_buffer(&self) {
        let dim = self.window_dimensions();
        let (cols, rows) = if dim.is_invalid() {
            (0, 0)
        } else {
            (dim.col as usize, dim.row as usize)
        };
        self.buffer().resize(cols, rows);
    }

    /// Snapshot of one write-buffer row.
    pub fn write_buffer_row(&self, row: usize) -> Option<String> {
        self.buffer().row(row)
    }

    /// Blank the screen and home the cursor.
    pub fn clear_screen(&self) {
        self.buffer().invalidate();
        *self.cursor.lock().unwrap_or_else(|e| e.into_inner()) = Position::default();
        self.report("clear screen", self.terminal.clear());
    }

    // -------------------------------------------------------------------------
    // Cursor
    // -------------------------------------------------------------------------

    pub fn set_cursor_position(&self, pos: Position) -> bool {
        *self.cursor.lock().unwrap_or_else(|e| e.into_inner()) = pos;
        self.report("cursor move", self.terminal.set_cursor_position(pos).and_then(|_| self.terminal.flush()))
    }

    /// Last position set through this console.
    pub fn cursor_position(&self) -> Position {
        *self.cursor.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_cursor_visibility(&self, visible: bool) -> bool {
        self.report("cursor visibility", self.terminal.set_cursor_visible(visible))
    }

    // -------------------------------------------------------------------------
    // Resize watcher
    // -------------------------------------------------------------------------

    /// Set the callback run after the watcher sees the window change size.
    pub fn set_resize_handler<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.resize_handler.lock().unwrap_or_else(|e| e.into_inner()) = Some(Arc::new(handler));
    }

    /// Start polling the window size. No-op if already running.
    pub fn start_resize_watcher(self: &Arc<Self>) -> Result<()> {
        let mut slot = self.resize_watcher.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_none() {
            *slot = Some(ResizeWatcher::spawn(Arc::downgrade(self), self.resize_poll_interval)?);
        }
        Ok(())
    }

    pub fn stop_resize_watcher(&self) {
        let watcher = self.resize_watcher.lock().unwrap_or_else(|e| e.into_inner()).take();
        drop(watcher);
    }

    pub fn resize_watcher_running(&self) -> bool {
        self.resize_watcher.lock().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    fn handle_resize(&self) {
        self.format_write_buffer();
        let handler = self.resize_handler.lock().unwrap_or_else(|e| e.into_inner()).clone();
        if let Some(handler) = handler {
            handler();
        }
    }

    /// Log a failed device call and turn the result into a flag.
    fn report(&self, what: &str, result: std::io::Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("{} failed: {}", what, e);
                false
            }
        }
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        self.stop_resize_watcher();
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("input_closed", &self.input_closed())
            .field("cursor", &self.cursor_position())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// RESIZE WATCHER
// =============================================================================

/// Background thread sampling the window size.
///
/// Holds only a weak reference to the console. Stop is signalled through a
/// condvar so it never waits out a full poll interval.
struct ResizeWatcher {
    stop: Arc<(Mutex<bool>, Condvar)>,
    handle: Option<JoinHandle<()>>,
}

impl ResizeWatcher {
    fn spawn(console: Weak<Console>, interval: Duration) -> std::io::Result<Self> {
        let stop = Arc::new((Mutex::new(false), Condvar::new()));
        let stop_clone = stop.clone();

        let handle = thread::Builder::new()
            .name("boxterm-resize".to_string())
            .spawn(move || Self::watch_loop(console, stop_clone, interval))?;

        tracing::debug!("resize watcher started");
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    fn watch_loop(console: Weak<Console>, stop: Arc<(Mutex<bool>, Condvar)>, interval: Duration) {
        let mut prev = match console.upgrade() {
            Some(console) => console.window_dimensions(),
            None => return,
        };

        let (lock, cvar) = &*stop;
        loop {
            let stopped = lock.lock().unwrap_or_else(|e| e.into_inner());
            let (stopped, _) = cvar
                .wait_timeout_while(stopped, interval, |stopped| !*stopped)
                .unwrap_or_else(|e| e.into_inner());
            if *stopped {
                return;
            }
            drop(stopped);

            let Some(console) = console.upgrade() else {
                return;
            };
            let curr = console.window_dimensions();
            if curr != prev {
                tracing::debug!(cols = curr.col, rows = curr.row, "window resized");
                console.handle_resize();
                prev = curr;
            }
        }
    }
}

impl Drop for ResizeWatcher {
    fn drop(&mut self) {
        let (lock, cvar) = &*self.stop;
        *lock.lock().unwrap_or_else(|e| e.into_inner()) = true;
        cvar.notify_all();

        if let Some(handle) = self.handle.take() {
            // The last console handle can be dropped on the watcher itself.
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
