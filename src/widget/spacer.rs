//! Spacer - layout padding.

use crate::device::Console;
use crate::input::MouseEvent;
use crate::types::{Boundary, DrawMode, Position, Reply};

use super::frame::Frame;
use super::BoxWidget;

/// Paints only its base (blank, or border if one is set). Never interactive.
#[derive(Debug, Clone, Default)]
pub struct Spacer {
    frame: Frame,
}

impl Spacer {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            frame: Frame::new(width, height),
        }
    }
}

impl BoxWidget for Spacer {
    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn print_protocol(&mut self, console: &Console, pos: Position, container: Boundary, mode: DrawMode) -> Reply {
        self.frame.print_base(console, pos, container, mode);
        self.frame.set_drawn(true);
        Reply::Continue
    }

    fn interact(&mut self, _console: &Console, _event: &MouseEvent) -> Reply {
        Reply::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::MemoryTerminal;

    #[test]
    fn test_spacer_blanks_its_area() {
        let terminal = MemoryTerminal::new(5, 2);
        let console = Console::new(Box::new(terminal.clone()));
        console.write_to_screen(Position::new(0, 0), "xxxxx");

        let mut spacer = Spacer::new(3, 1);
        spacer.draw(&console, Position::new(1, 0), console.window_boundary());
        assert_eq!(terminal.row(0), "x   x");
        assert_eq!(
            spacer.interact(&console, &MouseEvent::click(Position::new(1, 0))),
            Reply::Ignored
        );
    }
}
