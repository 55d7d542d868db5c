//! Widget Module - the box protocol and every widget kind
//!
//! Every widget is a rectangle with a [`Frame`] and implements
//! [`BoxWidget`]: one paint entry point (`print_protocol`) and one mouse
//! entry point (`interact`). `draw`/`buffer` choose the paint destination,
//! `redraw`/`rebuffer` replay the last placement.
//!
//! [`Widget`] is the closed set of widget kinds. Containers own their
//! children as `Widget` values, so copying a tree is a plain `clone()`.
//!
//! # Example
//!
//! ```
//! use boxterm::device::{Console, MemoryTerminal};
//! use boxterm::widget::{BoxWidget, TextBox, Widget};
//! use boxterm::{Position, Reply};
//!
//! let terminal = MemoryTerminal::new(20, 3);
//! let console = Console::new(Box::new(terminal.clone()));
//!
//! let mut label: Widget = TextBox::new(5, 1, "hello").into();
//! assert_eq!(label.redraw(&console), Reply::Failed);
//! assert_eq!(label.draw(&console, Position::new(0, 1), console.window_boundary()), Reply::Continue);
//! assert!(terminal.row(1).starts_with("hello"));
//! ```

use crate::device::Console;
use crate::input::MouseEvent;
use crate::layout::{HorizontalContainer, VerticalContainer};
use crate::menu::Menu;
use crate::types::{Alignment, BorderFill, Boundary, DrawMode, Position, Reply};

pub mod button;
pub mod entry;
pub mod frame;
pub mod graphic;
pub mod live;
pub mod scrolling;
pub mod spacer;
pub mod text;

pub use button::{Button, ButtonHandler, ExitButton, MenuButton};
pub use entry::{EntryTextBox, FocusOutcome, InputFilter, TextHandler};
pub use frame::{Frame, clamp_axis};
pub use graphic::{Graphic, GraphicLine};
pub use live::{LiveBinding, LiveTextBox};
pub use scrolling::ScrollingTextBox;
pub use spacer::Spacer;
pub use text::{TextBox, split_text};

// =============================================================================
// BOX WIDGET
// =============================================================================

/// The protocol every widget follows.
pub trait BoxWidget {
    fn frame(&self) -> &Frame;

    fn frame_mut(&mut self) -> &mut Frame;

    /// Size used by a parent for layout. Containers may compute it.
    fn width(&self) -> i32 {
        self.frame().target_width()
    }

    fn height(&self) -> i32 {
        self.frame().target_height()
    }

    /// Place, paint base and content, mark drawn.
    fn print_protocol(&mut self, console: &Console, pos: Position, container: Boundary, mode: DrawMode) -> Reply;

    /// React to a mouse event routed to this widget.
    fn interact(&mut self, console: &Console, event: &MouseEvent) -> Reply;

    /// Paint straight to the screen.
    fn draw(&mut self, console: &Console, pos: Position, container: Boundary) -> Reply {
        self.print_protocol(console, pos, container, DrawMode::Draw)
    }

    /// Paint into the console's write buffer.
    fn buffer(&mut self, console: &Console, pos: Position, container: Boundary) -> Reply {
        self.print_protocol(console, pos, container, DrawMode::Buffer)
    }

    /// Draw again at the last placement. `Failed` if never drawn.
    fn redraw(&mut self, console: &Console) -> Reply {
        if !self.frame().is_drawn() {
            return Reply::Failed;
        }
        let (pos, container) = self.frame().saved_placement();
        self.draw(console, pos, container)
    }

    /// Buffer again at the last placement. `Failed` if never drawn.
    fn rebuffer(&mut self, console: &Console) -> Reply {
        if !self.frame().is_drawn() {
            return Reply::Failed;
        }
        let (pos, container) = self.frame().saved_placement();
        self.buffer(console, pos, container)
    }

    fn pos_in_bounds(&self, pos: Position) -> bool {
        self.frame().pos_in_bounds(pos)
    }

    // ---- Frame conveniences ----

    fn set_dimensions(&mut self, width: i32, height: i32) {
        self.frame_mut().set_dimensions(width, height);
    }

    fn set_border_size(&mut self, size: i32) {
        self.frame_mut().set_border_size(size);
    }

    fn set_horizontal_border_size(&mut self, size: i32) {
        self.frame_mut().set_horizontal_border_size(size);
    }

    fn set_vertical_border_size(&mut self, size: i32) {
        self.frame_mut().set_vertical_border_size(size);
    }

    fn set_border_fill(&mut self, fill: BorderFill) {
        self.frame_mut().set_border_fill(fill);
    }

    fn set_alignment(&mut self, alignment: Alignment) {
        self.frame_mut().set_alignment(alignment);
    }

    fn set_transparent(&mut self, transparent: bool) {
        self.frame_mut().set_transparent(transparent);
    }

    fn is_drawn(&self) -> bool {
        self.frame().is_drawn()
    }

    fn absolute_position(&self) -> Position {
        self.frame().absolute_position()
    }

    /// Width after clamping at the last paint.
    fn actual_width(&self) -> i32 {
        self.frame().actual_width()
    }

    fn actual_height(&self) -> i32 {
        self.frame().actual_height()
    }
}

// =============================================================================
// WIDGET
// =============================================================================

/// Every kind of widget a container can hold.
#[derive(Debug, Clone)]
pub enum Widget {
    Spacer(Spacer),
    Text(TextBox),
    Button(Button),
    ExitButton(ExitButton),
    MenuButton(MenuButton),
    Live(LiveTextBox),
    Scrolling(ScrollingTextBox),
    Entry(EntryTextBox),
    Graphic(Graphic),
    Horizontal(HorizontalContainer),
    Vertical(VerticalContainer),
}

macro_rules! dispatch {
    ($self:expr, $w:ident => $body:expr) => {
        match $self {
            Widget::Spacer($w) => $body,
            Widget::Text($w) => $body,
            Widget::Button($w) => $body,
            Widget::ExitButton($w) => $body,
            Widget::MenuButton($w) => $body,
            Widget::Live($w) => $body,
            Widget::Scrolling($w) => $body,
            Widget::Entry($w) => $body,
            Widget::Graphic($w) => $body,
            Widget::Horizontal($w) => $body,
            Widget::Vertical($w) => $body,
        }
    };
}

impl Widget {
    /// Name of the widget kind.
    pub fn class_name(&self) -> &'static str {
        match self {
            Widget::Spacer(_) => "Spacer",
            Widget::Text(_) => "TextBox",
            Widget::Button(_) => "Button",
            Widget::ExitButton(_) => "ExitButton",
            Widget::MenuButton(_) => "MenuButton",
            Widget::Live(_) => "LiveTextBox",
            Widget::Scrolling(_) => "ScrollingTextBox",
            Widget::Entry(_) => "EntryTextBox",
            Widget::Graphic(_) => "Graphic",
            Widget::Horizontal(_) => "HorizontalContainer",
            Widget::Vertical(_) => "VerticalContainer",
        }
    }

    /// Layer path to the entry box currently holding input focus, if any.
    ///
    /// An empty path means this widget itself is the focused entry box.
    pub fn focused_path(&self) -> Option<Vec<i32>> {
        match self {
            Widget::Entry(entry) if entry.is_interacting() => Some(Vec::new()),
            Widget::Horizontal(c) => c.focused_path(),
            Widget::Vertical(c) => c.focused_path(),
            _ => None,
        }
    }

    /// Sub-menu requested by a clicked menu button in this subtree.
    pub fn take_pending_menu(&mut self) -> Option<Menu> {
        match self {
            Widget::MenuButton(button) => button.take_pending(),
            Widget::Horizontal(c) => c.take_pending_menu(),
            Widget::Vertical(c) => c.take_pending_menu(),
            _ => None,
        }
    }

    /// Follow a layer path down through containers.
    pub fn descend_mut(&mut self, path: &[i32]) -> Option<&mut Widget> {
        let Some((&first, rest)) = path.split_first() else {
            return Some(self);
        };
        match self {
            Widget::Horizontal(c) => c.get_mut(first)?.descend_mut(rest),
            Widget::Vertical(c) => c.get_mut(first)?.descend_mut(rest),
            _ => None,
        }
    }

    pub fn as_entry_mut(&mut self) -> Option<&mut EntryTextBox> {
        match self {
            Widget::Entry(entry) => Some(entry),
            _ => None,
        }
    }
}

impl BoxWidget for Widget {
    fn frame(&self) -> &Frame {
        dispatch!(self, w => w.frame())
    }

    fn frame_mut(&mut self) -> &mut Frame {
        dispatch!(self, w => w.frame_mut())
    }

    fn width(&self) -> i32 {
        dispatch!(self, w => w.width())
    }

    fn height(&self) -> i32 {
        dispatch!(self, w => w.height())
    }

    fn print_protocol(&mut self, console: &Console, pos: Position, container: Boundary, mode: DrawMode) -> Reply {
        dispatch!(self, w => w.print_protocol(console, pos, container, mode))
    }

    fn interact(&mut self, console: &Console, event: &MouseEvent) -> Reply {
        dispatch!(self, w => w.interact(console, event))
    }

    fn pos_in_bounds(&self, pos: Position) -> bool {
        dispatch!(self, w => w.pos_in_bounds(pos))
    }
}

macro_rules! widget_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Widget {
                fn from(w: $ty) -> Self {
                    Widget::$variant(w)
                }
            }
        )*
    };
}

widget_from! {
    Spacer => Spacer,
    TextBox => Text,
    Button => Button,
    ExitButton => ExitButton,
    MenuButton => MenuButton,
    LiveTextBox => Live,
    ScrollingTextBox => Scrolling,
    EntryTextBox => Entry,
    Graphic => Graphic,
    HorizontalContainer => Horizontal,
    VerticalContainer => Vertical,
}

// =============================================================================
// TESTS
// =============================================================================
