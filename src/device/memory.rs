//! In-memory terminal.
//!
//! A character grid plus a queue of input events. Cloning shares the same
//! state, so a test can hand one clone to a [`Console`](super::Console) and
//! keep another to script input and inspect the screen.
//!
//! Reads block until an event is queued or input is closed; a terminal built
//! with [`MemoryTerminal::scripted`] is closed up front, so a menu driven by
//! it returns once the script runs out.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use super::Terminal;
use crate::input::InputEvent;
use crate::types::Position;

#[derive(Debug)]
struct Screen {
    width: usize,
    height: usize,
    cells: Vec<char>,
    cursor: Position,
    cursor_visible: bool,
    resizable: bool,
    maximizable: bool,
    flushes: usize,
    entered: bool,
}

impl Screen {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; width * height],
            cursor: Position::default(),
            cursor_visible: true,
            resizable: true,
            maximizable: true,
            flushes: 0,
            entered: false,
        }
    }
}

#[derive(Debug, Default)]
struct InputQueue {
    events: VecDeque<InputEvent>,
    closed: bool,
}

#[derive(Debug)]
struct Shared {
    screen: Mutex<Screen>,
    input: Mutex<InputQueue>,
    input_ready: Condvar,
}

/// Headless terminal backed by a character grid.
#[derive(Debug, Clone)]
pub struct MemoryTerminal {
    shared: Arc<Shared>,
}

impl MemoryTerminal {
    /// Blank terminal with open (initially empty) input.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                screen: Mutex::new(Screen::new(width, height)),
                input: Mutex::new(InputQueue::default()),
                input_ready: Condvar::new(),
            }),
        }
    }

    /// Terminal whose input is exactly `events`, then closed.
    pub fn scripted(width: usize, height: usize, events: impl IntoIterator<Item = InputEvent>) -> Self {
        let terminal = Self::new(width, height);
        for event in events {
            terminal.push_event(event);
        }
        terminal.close_input();
        terminal
    }

    fn screen(&self) -> MutexGuard<'_, Screen> {
        self.shared.screen.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn input(&self) -> MutexGuard<'_, InputQueue> {
        self.shared.input.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue an input event.
    pub fn push_event(&self, event: impl Into<InputEvent>) {
        self.input().events.push_back(event.into());
        self.shared.input_ready.notify_all();
    }

    /// Mark input as finished. Queued events are still delivered.
    pub fn close_input(&self) {
        self.input().closed = true;
        self.shared.input_ready.notify_all();
    }

    pub fn pending_events(&self) -> usize {
        self.input().events.len()
    }

    /// Simulate the user resizing the window. Contents are cleared.
    pub fn resize(&self, width: usize, height: usize) {
        let mut screen = self.screen();
        let cursor = screen.cursor;
        let visible = screen.cursor_visible;
        *screen = Screen {
            cursor,
            cursor_visible: visible,
            ..Screen::new(width, height)
        };
    }

    /// One screen row as a string (empty if out of range).
    pub fn row(&self, row: usize) -> String {
        let screen = self.screen();
        if row >= screen.height {
            return String::new();
        }
        let start = row * screen.width;
        screen.cells[start..start + screen.width].iter().collect()
    }

    /// Whole screen, rows joined by `'\n'`.
    pub fn contents(&self) -> String {
        let height = self.screen().height;
        (0..height).map(|row| self.row(row)).collect::<Vec<_>>().join("\n")
    }

    pub fn char_at(&self, col: usize, row: usize) -> Option<char> {
        let screen = self.screen();
        (col < screen.width && row < screen.height).then(|| screen.cells[row * screen.width + col])
    }

    pub fn cursor(&self) -> Position {
        self.screen().cursor
    }

    pub fn cursor_visible(&self) -> bool {
        self.screen().cursor_visible
    }

    pub fn is_resizable(&self) -> bool {
        self.screen().resizable
    }

    pub fn is_maximizable(&self) -> bool {
        self.screen().maximizable
    }

    /// Number of flushes so far; lets tests see that a paint happened.
    pub fn flush_count(&self) -> usize {
        self.screen().flushes
    }

    pub fn is_entered(&self) -> bool {
        self.screen().entered
    }
}

impl Terminal for MemoryTerminal {
    fn size(&self) -> io::Result<Position> {
        let screen = self.screen();
        Ok(Position::new(screen.width as i32, screen.height as i32))
    }

    fn set_size(&self, cols: i32, rows: i32) -> io::Result<()> {
        if cols < 0 || rows < 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "negative window size"));
        }
        self.resize(cols as usize, rows as usize);
        Ok(())
    }

    fn allow_resize(&self, allow: bool) -> io::Result<()> {
        self.screen().resizable = allow;
        Ok(())
    }

    fn allow_maximize(&self, allow: bool) -> io::Result<()> {
        self.screen().maximizable = allow;
        Ok(())
    }

    fn read_event(&self) -> io::Result<Option<InputEvent>> {
        let mut input = self.input();
        loop {
            if let Some(event) = input.events.pop_front() {
                return Ok(Some(event));
            }
            if input.closed {
                return Ok(None);
            }
            input = self
                .shared
                .input_ready
                .wait(input)
                .unwrap_or_else(|e| e.into_inner());
        }
    }

    fn write_at(&self, pos: Position, text: &str) -> io::Result<()> {
        let mut screen = self.screen();
        if pos.col < 0 || pos.row < 0 {
            return Ok(());
        }
        let (col, row) = (pos.col as usize, pos.row as usize);
        if row >= screen.height || col >= screen.width {
            return Ok(());
        }
        let start = row * screen.width;
        let width = screen.width;
        for (cell, ch) in screen.cells[start + col..start + width].iter_mut().zip(text.chars()) {
            *cell = ch;
        }
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        self.screen().flushes += 1;
        Ok(())
    }

    fn set_cursor_position(&self, pos: Position) -> io::Result<()> {
        self.screen().cursor = pos;
        Ok(())
    }

    fn set_cursor_visible(&self, visible: bool) -> io::Result<()> {
        self.screen().cursor_visible = visible;
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        let mut screen = self.screen();
        screen.cells.fill(' ');
        screen.cursor = Position::default();
        Ok(())
    }

    fn discard_input(&self) -> io::Result<()> {
        self.input().events.clear();
        Ok(())
    }

    fn enter(&self) -> io::Result<()> {
        self.screen().entered = true;
        Ok(())
    }

    fn leave(&self) -> io::Result<()> {
        self.screen().entered = false;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
