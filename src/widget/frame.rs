//! Frame - geometry and base painting shared by every widget.
//!
//! A frame records what a widget asked for (target size, border, alignment)
//! and what it got on its last paint (absolute position, actual size). The
//! actual values are only meaningful once `drawn` is set.
//!
//! # Clamping
//!
//! [`Frame::place`] resolves a requested origin against a containing
//! boundary, per axis:
//!
//! 1. The boundary is intersected with the window.
//! 2. An origin before the near edge snaps to it.
//! 3. If the far edge (`origin + target - 1`) overshoots, the origin slides
//!    back by the overshoot; if that crosses the near edge, the origin is
//!    pinned there and the size shrinks by the difference.
//! 4. The size never drops below 0.
//!
//! The result always satisfies `0 <= actual <= target`.

use crate::device::Console;
use crate::types::{Alignment, BorderFill, Boundary, DrawMode, Position};

/// Shared widget state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    target_width: i32,
    target_height: i32,
    actual_width: i32,
    actual_height: i32,
    absolute_pos: Position,
    horiz_border: i32,
    vert_border: i32,
    border_fill: BorderFill,
    alignment: Alignment,
    transparent: bool,
    drawn: bool,
    saved_pos: Position,
    saved_bound: Boundary,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl Frame {
    /// Negative sizes are treated as 0.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            target_width: width,
            target_height: height,
            actual_width: width,
            actual_height: height,
            absolute_pos: Position::default(),
            horiz_border: 0,
            vert_border: 0,
            border_fill: BorderFill::default(),
            alignment: Alignment::default(),
            transparent: false,
            drawn: false,
            saved_pos: Position::default(),
            saved_bound: Boundary::default(),
        }
    }

    // -------------------------------------------------------------------------
    // Getters
    // -------------------------------------------------------------------------

    #[inline]
    pub fn target_width(&self) -> i32 {
        self.target_width
    }

    #[inline]
    pub fn target_height(&self) -> i32 {
        self.target_height
    }

    #[inline]
    pub fn actual_width(&self) -> i32 {
        self.actual_width
    }

    #[inline]
    pub fn actual_height(&self) -> i32 {
        self.actual_height
    }

    #[inline]
    pub fn absolute_position(&self) -> Position {
        self.absolute_pos
    }

    #[inline]
    pub fn horizontal_border(&self) -> i32 {
        self.horiz_border
    }

    #[inline]
    pub fn vertical_border(&self) -> i32 {
        self.vert_border
    }

    #[inline]
    pub fn border_fill(&self) -> BorderFill {
        self.border_fill
    }

    #[inline]
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    #[inline]
    pub fn is_drawn(&self) -> bool {
        self.drawn
    }

    /// Origin and boundary of the last paint, replayed by redraw.
    #[inline]
    pub fn saved_placement(&self) -> (Position, Boundary) {
        (self.saved_pos, self.saved_bound)
    }

    /// Columns available for content inside the side borders.
    #[inline]
    pub fn printable_width(&self) -> i32 {
        (self.actual_width - 2 * self.vert_border).max(0)
    }

    /// Rows available for content inside the top and bottom borders.
    #[inline]
    pub fn printable_height(&self) -> i32 {
        (self.actual_height - 2 * self.horiz_border).max(0)
    }

    /// Inclusive interior rectangle from the last placement.
    pub fn content_bound(&self) -> Boundary {
        let pos = self.absolute_pos;
        Boundary::new(
            pos.col.saturating_add(self.vert_border),
            pos.row.saturating_add(self.horiz_border),
            pos.col.saturating_add(self.actual_width - self.vert_border - 1),
            pos.row.saturating_add(self.actual_height - self.horiz_border - 1),
        )
    }

    // -------------------------------------------------------------------------
    // Setters
    // -------------------------------------------------------------------------

    pub fn set_dimensions(&mut self, width: i32, height: i32) {
        self.target_width = width.max(0);
        self.target_height = height.max(0);
        self.actual_width = self.target_width;
        self.actual_height = self.target_height;
    }

    pub fn set_border_size(&mut self, size: i32) {
        self.horiz_border = size.max(0);
        self.vert_border = size.max(0);
    }

    /// Thickness of the top and bottom borders.
    pub fn set_horizontal_border_size(&mut self, size: i32) {
        self.horiz_border = size.max(0);
    }

    /// Thickness of the left and right borders.
    pub fn set_vertical_border_size(&mut self, size: i32) {
        self.vert_border = size.max(0);
    }

    pub fn set_border_fill(&mut self, fill: impl Into<BorderFill>) {
        self.border_fill = fill.into();
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
    }

    pub fn set_transparent(&mut self, transparent: bool) {
        self.transparent = transparent;
    }

    pub fn set_drawn(&mut self, drawn: bool) {
        self.drawn = drawn;
    }

    // -------------------------------------------------------------------------
    // Placement
    // -------------------------------------------------------------------------

    /// Resolve the absolute position and actual size using the stored target.
    pub fn place(&mut self, window: Boundary, pos: Position, container: Boundary) {
        self.place_sized(window, pos, container, self.target_width, self.target_height);
    }

    /// Resolve placement for an explicit target size.
    ///
    /// Containers pass their computed (dynamic) size here without touching
    /// the stored target.
    pub fn place_sized(
        &mut self,
        window: Boundary,
        pos: Position,
        container: Boundary,
        width: i32,
        height: i32,
    ) {
        self.saved_pos = pos;
        self.saved_bound = container;

        let bound = container.intersect(&window);
        let (col, actual_width) = clamp_axis(pos.col, width, bound.left, bound.right);
        let (row, actual_height) = clamp_axis(pos.row, height, bound.top, bound.bottom);

        self.absolute_pos = Position::new(col, row);
        self.actual_width = actual_width;
        self.actual_height = actual_height;
    }

    /// True iff drawn and `pos` is inside the last painted rectangle.
    pub fn pos_in_bounds(&self, pos: Position) -> bool {
        if !self.drawn || self.actual_width <= 0 || self.actual_height <= 0 {
            return false;
        }
        let origin = self.absolute_pos;
        pos.col >= origin.col
            && pos.col <= origin.col.saturating_add(self.actual_width - 1)
            && pos.row >= origin.row
            && pos.row <= origin.row.saturating_add(self.actual_height - 1)
    }

    // -------------------------------------------------------------------------
    // Base painting
    // -------------------------------------------------------------------------

    /// Place using the stored target, then paint borders and background.
    pub fn print_base(&mut self, console: &Console, pos: Position, container: Boundary, mode: DrawMode) {
        self.place(console.window_boundary(), pos, container);
        self.paint_base(console, mode);
    }

    /// Paint border rows, side borders and (unless transparent) blank interior
    /// cells for the current placement.
    pub fn paint_base(&self, console: &Console, mode: DrawMode) {
        let width = self.actual_width;
        let height = self.actual_height;
        if width <= 0 || height <= 0 {
            return;
        }

        let fill = self.border_fill;
        let sides = self.vert_border.min(width) as usize;
        let width = width as usize;
        let origin = self.absolute_pos;

        let with_sides = |middle: char| -> String {
            let mut row = vec![middle; width];
            for i in 0..sides {
                row[i] = fill.left;
                row[width - 1 - i] = fill.right;
            }
            row.into_iter().collect()
        };
        let top_row = with_sides(fill.top);
        let bottom_row = with_sides(fill.bottom);
        let interior_row = with_sides(' ');
        let left_side: String = std::iter::repeat_n(fill.left, sides).collect();
        let right_side: String = std::iter::repeat_n(fill.right, sides).collect();

        for i in 0..height {
            let at = Position::new(origin.col, origin.row + i);
            if i < self.horiz_border {
                console.write(mode, at, &top_row);
            } else if height - i <= self.horiz_border {
                console.write(mode, at, &bottom_row);
            } else if !self.transparent {
                console.write(mode, at, &interior_row);
            } else if sides > 0 {
                console.write(mode, at, &left_side);
                console.write(mode, at.offset((width - sides) as i32, 0), &right_side);
            }
        }
    }
}

/// Clamp one axis. Returns `(origin, actual)`.
///
/// Computed in i64 so a `FILL` target cannot overflow.
pub fn clamp_axis(pos: i32, target: i32, near: i32, far: i32) -> (i32, i32) {
    let (near, far) = (near as i64, far as i64);
    let mut origin = (pos as i64).max(near);
    let mut actual = target.max(0) as i64;

    let overshoot = origin + actual - 1 - far;
    if overshoot > 0 {
        origin -= overshoot;
        if origin < near {
            actual -= near - origin;
            origin = near;
        }
    }
    if far >= near {
        origin = origin.min(far);
    }

    (origin as i32, actual.max(0) as i32)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::MemoryTerminal;
    use crate::types::FILL;
    use std::sync::Arc;

    const WINDOW: Boundary = Boundary::new(0, 0, 79, 24);

    fn setup(width: usize, height: usize) -> (Arc<Console>, MemoryTerminal) {
        let terminal = MemoryTerminal::new(width, height);
        (Console::new(Box::new(terminal.clone())), terminal)
    }

    // ---- Clamping ----

    #[test]
    fn test_fits_unchanged() {
        assert_eq!(clamp_axis(5, 10, 0, 79), (5, 10));
    }

    #[test]
    fn test_origin_snaps_to_near_edge() {
        assert_eq!(clamp_axis(-3, 4, 2, 20), (2, 4));
    }

    #[test]
    fn test_overshoot_slides_back() {
        assert_eq!(clamp_axis(15, 10, 0, 19), (10, 10));
    }

    #[test]
    fn test_too_large_shrinks() {
        assert_eq!(clamp_axis(3, 30, 2, 11), (2, 10));
    }

    #[test]
    fn test_fill_takes_whole_span() {
        assert_eq!(clamp_axis(0, FILL, 0, 79), (0, 80));
        assert_eq!(clamp_axis(4, FILL, 4, 9), (4, 6));
    }

    #[test]
    fn test_empty_boundary_gives_zero() {
        let (_, actual) = clamp_axis(0, 5, 3, 2);
        assert_eq!(actual, 0);
    }

    #[test]
    fn test_clamping_property_sweep() {
        for target in 0..25 {
            for pos in -5..40 {
                for (near, far) in [(0, 9), (3, 17), (10, 10), (0, 30)] {
                    let (origin, actual) = clamp_axis(pos, target, near, far);
                    assert!(actual >= 0 && actual <= target, "actual {actual} target {target}");
                    assert!(origin >= near && origin <= far, "origin {origin} in {near}..={far}");
                    assert!(origin + actual - 1 <= far);
                }
            }
        }
    }

    #[test]
    fn test_place_clamps_to_window() {
        let mut frame = Frame::new(10, 4);
        frame.place(Boundary::new(0, 0, 19, 9), Position::new(15, 8), Boundary::new(0, 0, 100, 100));
        assert_eq!(frame.absolute_position(), Position::new(10, 6));
        assert_eq!((frame.actual_width(), frame.actual_height()), (10, 4));
        assert_eq!(frame.saved_placement().0, Position::new(15, 8));
    }

    #[test]
    fn test_content_bound() {
        let mut frame = Frame::new(10, 6);
        frame.set_horizontal_border_size(1);
        frame.set_vertical_border_size(2);
        frame.place(WINDOW, Position::new(3, 4), WINDOW);
        assert_eq!(frame.content_bound(), Boundary::new(5, 5, 10, 8));
        assert_eq!(frame.printable_width(), 6);
        assert_eq!(frame.printable_height(), 4);
    }

    // ---- Hit testing ----

    #[test]
    fn test_pos_in_bounds_requires_drawn() {
        let mut frame = Frame::new(4, 2);
        frame.place(WINDOW, Position::new(1, 1), WINDOW);
        assert!(!frame.pos_in_bounds(Position::new(1, 1)));

        frame.set_drawn(true);
        assert!(frame.pos_in_bounds(Position::new(1, 1)));
        assert!(frame.pos_in_bounds(Position::new(4, 2)));
        assert!(!frame.pos_in_bounds(Position::new(5, 2)));
        assert!(!frame.pos_in_bounds(Position::new(4, 3)));
        assert!(!frame.pos_in_bounds(Position::new(0, 1)));
    }

    // ---- Base painting ----

    #[test]
    fn test_print_base_with_borders() {
        let (console, terminal) = setup(8, 5);
        let mut frame = Frame::new(5, 4);
        frame.set_border_size(1);
        frame.set_border_fill(BorderFill::new('<', '^', '>', 'v'));
        frame.print_base(&console, Position::new(1, 0), console.window_boundary(), DrawMode::Draw);

        assert_eq!(terminal.row(0), " <^^^>  ");
        assert_eq!(terminal.row(1), " <   >  ");
        assert_eq!(terminal.row(2), " <   >  ");
        assert_eq!(terminal.row(3), " <vvv>  ");
        assert_eq!(terminal.row(4), "        ");
    }

    #[test]
    fn test_transparent_leaves_interior() {
        let (console, terminal) = setup(6, 4);
        for row in 0..4 {
            console.write_to_screen(Position::new(0, row), "......");
        }
        let mut frame = Frame::new(6, 4);
        frame.set_border_size(1);
        frame.set_border_fill('#');
        frame.set_transparent(true);
        frame.print_base(&console, Position::new(0, 0), console.window_boundary(), DrawMode::Draw);

        assert_eq!(terminal.row(0), "######");
        assert_eq!(terminal.row(1), "#....#");
        assert_eq!(terminal.row(2), "#....#");
        assert_eq!(terminal.row(3), "######");
    }

    #[test]
    fn test_buffered_base_waits_for_flush() {
        let (console, terminal) = setup(4, 2);
        let mut frame = Frame::new(4, 1);
        frame.set_horizontal_border_size(1);
        frame.set_border_fill('=');
        frame.print_base(&console, Position::new(0, 1), console.window_boundary(), DrawMode::Buffer);
        assert_eq!(terminal.row(1), "    ");

        console.print_write_buffer();
        assert_eq!(terminal.row(1), "====");
    }
}
