//! Core types for boxterm.
//!
//! Geometry, alignment flags and the `Reply` outcome enum. Everything in the
//! layout protocol and the menu loop is expressed in these types.

use serde::{Deserialize, Serialize};

// =============================================================================
// SENTINELS
// =============================================================================

/// Target size meaning "fill whatever space the containing boundary offers".
///
/// Resolved during clamping: a box with a `FILL` width always ends up exactly
/// as wide as the space between its origin and the boundary's right edge.
pub const FILL: i32 = i32::MAX;

/// Position reported by the device adapter when a query fails.
pub const INVALID_POSITION: Position = Position { col: -1, row: -1 };

// =============================================================================
// POSITION
// =============================================================================

/// Integer grid coordinate, console-relative. Column first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub col: i32,
    pub row: i32,
}

impl Position {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// True for the sentinel returned by a failed device query.
    #[inline]
    pub fn is_invalid(&self) -> bool {
        self.col < 0 || self.row < 0
    }

    /// Component-wise offset.
    #[inline]
    pub fn offset(&self, col: i32, row: i32) -> Self {
        Self {
            col: self.col.saturating_add(col),
            row: self.row.saturating_add(row),
        }
    }
}

// =============================================================================
// BOUNDARY
// =============================================================================

/// Inclusive rectangle: both `right` and `bottom` are the last usable cells.
///
/// Used as the clipping constraint handed down to a widget and as a
/// container's usable interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Boundary {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Boundary {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Number of columns covered, 0 when the rectangle is empty.
    #[inline]
    pub fn width(&self) -> i32 {
        (self.right as i64 - self.left as i64 + 1).clamp(0, i32::MAX as i64) as i32
    }

    /// Number of rows covered, 0 when the rectangle is empty.
    #[inline]
    pub fn height(&self) -> i32 {
        (self.bottom as i64 - self.top as i64 + 1).clamp(0, i32::MAX as i64) as i32
    }

    /// Check if a point lies inside (inclusive on every edge).
    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.col >= self.left && pos.col <= self.right && pos.row >= self.top && pos.row <= self.bottom
    }

    /// Intersection with another boundary. May produce an empty rectangle.
    pub fn intersect(&self, other: &Boundary) -> Boundary {
        Boundary {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        }
    }
}

// =============================================================================
// ALIGNMENT (BITFLAGS)
// =============================================================================

bitflags::bitflags! {
    /// Placement of content inside a box.
    ///
    /// Combine one horizontal and one vertical flag:
    /// `Alignment::CENTER | Alignment::MIDDLE`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Alignment: u8 {
        const LEFT = 1 << 0;
        const CENTER = 1 << 1;
        const RIGHT = 1 << 2;
        const TOP = 1 << 3;
        const MIDDLE = 1 << 4;
        const BOTTOM = 1 << 5;
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Alignment::LEFT | Alignment::MIDDLE
    }
}

/// Where along one axis a block of content sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisPlacement {
    Start,
    Center,
    End,
}

impl AxisPlacement {
    /// Offset of an item of length `item` inside a span of length `span`.
    ///
    /// Negative results are possible when the item is larger than the span;
    /// callers rely on clamping to pull the item back inside.
    #[inline]
    pub fn offset(self, span: i32, item: i32) -> i32 {
        let slack = span as i64 - item as i64;
        let value = match self {
            AxisPlacement::Start => 0,
            AxisPlacement::Center => slack / 2,
            AxisPlacement::End => slack,
        };
        value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }
}

impl Alignment {
    /// Horizontal component. Defaults to `Start` when no flag is set;
    /// LEFT wins over RIGHT, RIGHT wins over CENTER.
    pub fn horizontal(self) -> AxisPlacement {
        if self.contains(Alignment::LEFT) {
            AxisPlacement::Start
        } else if self.contains(Alignment::RIGHT) {
            AxisPlacement::End
        } else if self.contains(Alignment::CENTER) {
            AxisPlacement::Center
        } else {
            AxisPlacement::Start
        }
    }

    /// Vertical component. Defaults to `Center` when no flag is set.
    pub fn vertical(self) -> AxisPlacement {
        if self.contains(Alignment::TOP) {
            AxisPlacement::Start
        } else if self.contains(Alignment::BOTTOM) {
            AxisPlacement::End
        } else {
            AxisPlacement::Center
        }
    }
}

// =============================================================================
// REPLY
// =============================================================================

/// Outcome of a paint or interaction call.
///
/// `Refresh` and `Exit` are control signals consumed by the owning menu, not
/// failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Reply {
    /// The event did not apply to this widget.
    Ignored,
    /// Normal successful completion.
    #[default]
    Continue,
    /// Ask the owning menu to repaint.
    Refresh,
    /// Ask the caller to run the operation again.
    Repeat,
    /// The widget was not ready (never drawn, handler missing).
    Failed,
    /// Ask the owning menu to leave its loop.
    Exit,
}

// =============================================================================
// DISTRIBUTION
// =============================================================================

/// How a container spreads its dynamic children along its primary axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Distribution {
    /// Equal gaps before, between and after the children.
    #[default]
    EvenSpaced,
    /// Equal gaps between children only; the outer children touch the edges.
    SpacedToEdge,
    /// Children packed together, slack placed by the container's alignment.
    None,
}

// =============================================================================
// BORDER FILL
// =============================================================================

/// One fill character per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BorderFill {
    pub left: char,
    pub top: char,
    pub right: char,
    pub bottom: char,
}

impl BorderFill {
    pub const fn new(left: char, top: char, right: char, bottom: char) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The same character on every side.
    pub const fn uniform(fill: char) -> Self {
        Self::new(fill, fill, fill, fill)
    }
}

impl Default for BorderFill {
    fn default() -> Self {
        Self::uniform('#')
    }
}

impl From<char> for BorderFill {
    fn from(fill: char) -> Self {
        Self::uniform(fill)
    }
}

// =============================================================================
// DRAW MODE
// =============================================================================

/// Where a paint goes: straight to the device or into the write buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    /// Immediate per-row writes to the screen.
    Draw,
    /// Deferred writes into the console's off-screen buffer.
    #[default]
    Buffer,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_dimensions() {
        let b = Boundary::new(2, 3, 11, 7);
        assert_eq!(b.width(), 10);
        assert_eq!(b.height(), 5);

        let empty = Boundary::new(5, 5, 4, 4);
        assert_eq!(empty.width(), 0);
        assert_eq!(empty.height(), 0);
    }

    #[test]
    fn test_boundary_contains_is_inclusive() {
        let b = Boundary::new(0, 0, 9, 4);
        assert!(b.contains(Position::new(0, 0)));
        assert!(b.contains(Position::new(9, 4)));
        assert!(!b.contains(Position::new(10, 4)));
        assert!(!b.contains(Position::new(-1, 2)));
    }

    #[test]
    fn test_boundary_intersect() {
        let a = Boundary::new(0, 0, 10, 10);
        let b = Boundary::new(5, -3, 20, 6);
        assert_eq!(a.intersect(&b), Boundary::new(5, 0, 10, 6));
    }

    #[test]
    fn test_alignment_default_is_left_middle() {
        let align = Alignment::default();
        assert_eq!(align.horizontal(), AxisPlacement::Start);
        assert_eq!(align.vertical(), AxisPlacement::Center);
    }

    #[test]
    fn test_alignment_components() {
        let align = Alignment::RIGHT | Alignment::BOTTOM;
        assert_eq!(align.horizontal(), AxisPlacement::End);
        assert_eq!(align.vertical(), AxisPlacement::End);

        let align = Alignment::CENTER | Alignment::TOP;
        assert_eq!(align.horizontal(), AxisPlacement::Center);
        assert_eq!(align.vertical(), AxisPlacement::Start);
    }

    #[test]
    fn test_axis_placement_offset() {
        assert_eq!(AxisPlacement::Start.offset(10, 4), 0);
        assert_eq!(AxisPlacement::Center.offset(10, 4), 3);
        assert_eq!(AxisPlacement::End.offset(10, 4), 6);
        assert_eq!(AxisPlacement::End.offset(4, 10), -6);
    }

    #[test]
    fn test_position_invalid_sentinel() {
        assert!(INVALID_POSITION.is_invalid());
        assert!(!Position::new(0, 0).is_invalid());
        assert_eq!(Position::new(i32::MAX, 0).offset(5, 1), Position::new(i32::MAX, 1));
    }

    #[test]
    fn test_border_fill_from_char() {
        let fill: BorderFill = '*'.into();
        assert_eq!(fill, BorderFill::new('*', '*', '*', '*'));
    }
}
