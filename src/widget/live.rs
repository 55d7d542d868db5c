//! LiveTextBox - text that re-reads a shared value on every paint.
//!
//! The value lives behind an `Arc` so application code can keep updating it
//! from the dispatch thread while the auto-print thread repaints.

use std::sync::atomic::{AtomicI32, AtomicI64, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::device::Console;
use crate::input::MouseEvent;
use crate::types::{Boundary, DrawMode, Position, Reply};

use super::frame::Frame;
use super::text::TextBox;
use super::BoxWidget;

/// A shared variable a [`LiveTextBox`] displays.
#[derive(Debug, Clone)]
pub enum LiveBinding {
    Int(Arc<AtomicI32>),
    Long(Arc<AtomicI64>),
    Unsigned(Arc<AtomicU32>),
    Float(Arc<Mutex<f32>>),
    Double(Arc<Mutex<f64>>),
    Char(Arc<Mutex<char>>),
    Text(Arc<Mutex<String>>),
}

impl LiveBinding {
    /// Current value as display text. Floating values use 6 decimals.
    pub fn render(&self) -> String {
        match self {
            LiveBinding::Int(v) => v.load(Ordering::Relaxed).to_string(),
            LiveBinding::Long(v) => v.load(Ordering::Relaxed).to_string(),
            LiveBinding::Unsigned(v) => v.load(Ordering::Relaxed).to_string(),
            LiveBinding::Float(v) => format!("{:.6}", read(v)),
            LiveBinding::Double(v) => format!("{:.6}", read(v)),
            LiveBinding::Char(v) => read(v).to_string(),
            LiveBinding::Text(v) => match v.lock() {
                Ok(s) => s.clone(),
                Err(poisoned) => poisoned.into_inner().clone(),
            },
        }
    }
}

fn read<T: Copy>(value: &Mutex<T>) -> T {
    match value.lock() {
        Ok(v) => *v,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

macro_rules! binding_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Arc<$ty>> for LiveBinding {
                fn from(value: Arc<$ty>) -> Self {
                    LiveBinding::$variant(value)
                }
            }
        )*
    };
}

binding_from! {
    AtomicI32 => Int,
    AtomicI64 => Long,
    AtomicU32 => Unsigned,
    Mutex<f32> => Float,
    Mutex<f64> => Double,
    Mutex<char> => Char,
    Mutex<String> => Text,
}

/// Read-only display of a [`LiveBinding`]. Unbound boxes show their text.
#[derive(Debug, Clone, Default)]
pub struct LiveTextBox {
    text: TextBox,
    binding: Option<LiveBinding>,
}

impl LiveTextBox {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            text: TextBox::new(width, height, ""),
            binding: None,
        }
    }

    pub fn bind(&mut self, binding: impl Into<LiveBinding>) {
        self.binding = Some(binding.into());
    }

    pub fn with_binding(mut self, binding: impl Into<LiveBinding>) -> Self {
        self.bind(binding);
        self
    }

    pub fn binding(&self) -> Option<&LiveBinding> {
        self.binding.as_ref()
    }

    /// Text shown by the last paint.
    pub fn text(&self) -> &str {
        self.text.text()
    }
}

impl BoxWidget for LiveTextBox {
    fn frame(&self) -> &Frame {
        self.text.frame()
    }

    fn frame_mut(&mut self) -> &mut Frame {
        self.text.frame_mut()
    }

    fn print_protocol(&mut self, console: &Console, pos: Position, container: Boundary, mode: DrawMode) -> Reply {
        if let Some(binding) = &self.binding {
            self.text.set_text(binding.render());
        }
        self.text.paint(console, pos, container, mode)
    }

    fn interact(&mut self, _console: &Console, _event: &MouseEvent) -> Reply {
        Reply::Ignored
    }
}
