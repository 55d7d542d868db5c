//! Box containers - keyed child storage plus axis layout.
//!
//! Children live in a `BTreeMap` keyed by layer. A child is either dynamic
//! (laid out along the primary axis) or fixed (painted at a stored offset
//! from the container's origin).
//!
//! # Layout
//!
//! 1. Resolve the container's own size (target, or grown to fit children
//!    when dynamically sized) and paint its base.
//! 2. Compute gaps for the dynamic children with [`spacing`].
//! 3. Walk children in descending key order from the far interior edge,
//!    subtracting each dynamic child's trailing gap and extent to find its
//!    origin. The cross-axis offset comes from the container's alignment.
//! 4. Every child is painted with the container's interior as boundary.
//!
//! Mouse dispatch scans children in ascending key order and hands the event
//! to the first child containing its position.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use crate::device::Console;
use crate::input::MouseEvent;
use crate::menu::Menu;
use crate::types::{AxisPlacement, Boundary, Distribution, DrawMode, Position, Reply};
use crate::widget::{BoxWidget, Frame, Widget};

use super::distribution::spacing;

// =============================================================================
// AXIS
// =============================================================================

/// Primary layout direction of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Split `(width, height)` into `(primary, cross)`.
    #[inline]
    fn split(self, width: i32, height: i32) -> (i32, i32) {
        match self {
            Axis::Horizontal => (width, height),
            Axis::Vertical => (height, width),
        }
    }

    /// Inverse of [`Axis::split`].
    #[inline]
    fn join(self, primary: i32, cross: i32) -> (i32, i32) {
        match self {
            Axis::Horizontal => (primary, cross),
            Axis::Vertical => (cross, primary),
        }
    }

    /// Border thickness at the ends of the `(primary, cross)` axes.
    fn borders(self, frame: &Frame) -> (i32, i32) {
        self.split(frame.vertical_border(), frame.horizontal_border())
    }

    fn placements(self, frame: &Frame) -> (AxisPlacement, AxisPlacement) {
        let alignment = frame.alignment();
        match self {
            Axis::Horizontal => (alignment.horizontal(), alignment.vertical()),
            Axis::Vertical => (alignment.vertical(), alignment.horizontal()),
        }
    }
}

/// Marker selecting a container's [`Axis`] at the type level.
pub trait LayoutAxis: Clone + Default + fmt::Debug + Send + Sync + 'static {
    const AXIS: Axis;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Horizontal;

#[derive(Debug, Clone, Copy, Default)]
pub struct Vertical;

impl LayoutAxis for Horizontal {
    const AXIS: Axis = Axis::Horizontal;
}

impl LayoutAxis for Vertical {
    const AXIS: Axis = Axis::Vertical;
}

/// Children laid out left to right.
pub type HorizontalContainer = BoxContainer<Horizontal>;

/// Children laid out top to bottom.
pub type VerticalContainer = BoxContainer<Vertical>;

// =============================================================================
// BOX CONTAINER
// =============================================================================

#[derive(Debug, Clone)]
struct Child {
    widget: Widget,
    fixed: Option<Position>,
}

#[derive(Debug, Clone)]
pub struct BoxContainer<A: LayoutAxis> {
    frame: Frame,
    children: BTreeMap<i32, Child>,
    dynamic_size: bool,
    distribution: Distribution,
    recent: Option<i32>,
    _axis: PhantomData<A>,
}

impl<A: LayoutAxis> Default for BoxContainer<A> {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl<A: LayoutAxis> BoxContainer<A> {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            frame: Frame::new(width, height),
            children: BTreeMap::new(),
            dynamic_size: false,
            distribution: Distribution::default(),
            recent: None,
            _axis: PhantomData,
        }
    }

    pub fn axis(&self) -> Axis {
        A::AXIS
    }

    // -------------------------------------------------------------------------
    // Child storage
    // -------------------------------------------------------------------------

    /// Insert above the current top layer (layer 1 when empty).
    pub fn insert(&mut self, widget: impl Into<Widget>) -> i32 {
        let layer = self
            .children
            .keys()
            .next_back()
            .map_or(1, |top| top.saturating_add(1));
        self.insert_at(layer, widget);
        layer
    }

    /// Insert at `layer`, replacing any child already there.
    pub fn insert_at(&mut self, layer: i32, widget: impl Into<Widget>) {
        self.put(layer, widget.into(), None);
    }

    /// Insert a child painted at `offset` from this container's origin.
    /// Fixed children take no part in distribution.
    pub fn insert_fixed(&mut self, layer: i32, widget: impl Into<Widget>, offset: Position) {
        self.put(layer, widget.into(), Some(offset));
    }

    fn put(&mut self, layer: i32, widget: Widget, fixed: Option<Position>) {
        if let Some(previous) = self.children.insert(layer, Child { widget, fixed }) {
            tracing::trace!(layer, replaced = previous.widget.class_name(), "container layer replaced");
        }
        self.recent = Some(layer);
    }

    pub fn remove(&mut self, layer: i32) -> Option<Widget> {
        if self.recent == Some(layer) {
            self.recent = None;
        }
        self.children.remove(&layer).map(|child| child.widget)
    }

    pub fn get(&self, layer: i32) -> Option<&Widget> {
        self.children.get(&layer).map(|child| &child.widget)
    }

    pub fn get_mut(&mut self, layer: i32) -> Option<&mut Widget> {
        self.children.get_mut(&layer).map(|child| &mut child.widget)
    }

    /// The child inserted last, if it is still present.
    pub fn recent_mut(&mut self) -> Option<&mut Widget> {
        let layer = self.recent?;
        self.get_mut(layer)
    }

    /// Fixed offset of the child at `layer`, if it is fixed.
    pub fn fixed_offset(&self, layer: i32) -> Option<Position> {
        self.children.get(&layer).and_then(|child| child.fixed)
    }

    pub fn layers(&self) -> impl Iterator<Item = i32> + '_ {
        self.children.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn clear(&mut self) {
        self.children.clear();
        self.recent = None;
    }

    // -------------------------------------------------------------------------
    // Layout settings
    // -------------------------------------------------------------------------

    /// Grow to fit the children when they exceed the target size.
    pub fn set_dynamic_size(&mut self, dynamic: bool) {
        self.dynamic_size = dynamic;
    }

    pub fn is_dynamic_size(&self) -> bool {
        self.dynamic_size
    }

    pub fn set_distribution(&mut self, distribution: Distribution) {
        self.distribution = distribution;
    }

    pub fn distribution(&self) -> Distribution {
        self.distribution
    }

    /// Width the children need, borders included.
    pub fn content_width(&self) -> i32 {
        self.content_size().0
    }

    /// Height the children need, borders included.
    pub fn content_height(&self) -> i32 {
        self.content_size().1
    }

    /// Sum of children along the primary axis, max across; plus borders.
    fn content_size(&self) -> (i32, i32) {
        let axis = A::AXIS;
        let (mut primary, mut cross) = (0i64, 0i64);
        for child in self.children.values() {
            let (p, c) = axis.split(child.widget.width(), child.widget.height());
            primary += p as i64;
            cross = cross.max(c as i64);
        }
        let (primary_border, cross_border) = axis.borders(&self.frame);
        primary += 2 * primary_border as i64;
        cross += 2 * cross_border as i64;
        axis.join(saturate(primary), saturate(cross))
    }

    /// Sub-menu requested by a menu button below this container. Only one
    /// request can be outstanding per dispatch.
    pub fn take_pending_menu(&mut self) -> Option<Menu> {
        self.children.values_mut().find_map(|child| child.widget.take_pending_menu())
    }

    /// Layer path to a focused entry box below this container.
    pub fn focused_path(&self) -> Option<Vec<i32>> {
        self.children.iter().find_map(|(&layer, child)| {
            let mut path = child.widget.focused_path()?;
            path.insert(0, layer);
            Some(path)
        })
    }

    // -------------------------------------------------------------------------
    // Painting
    // -------------------------------------------------------------------------

    fn paint_children(&mut self, console: &Console, mode: DrawMode) {
        if self.children.is_empty() {
            return;
        }
        let axis = A::AXIS;
        let frame = &self.frame;
        let origin = frame.absolute_position();
        let interior = frame.content_bound();
        let (primary_border, cross_border) = axis.borders(frame);
        let (primary_place, cross_place) = axis.placements(frame);
        let (actual_primary, _) = axis.split(frame.actual_width(), frame.actual_height());
        let (interior_primary, interior_cross) = axis.split(frame.printable_width(), frame.printable_height());

        let (count, extent) = self
            .children
            .values()
            .filter(|child| child.fixed.is_none())
            .fold((0usize, 0i64), |(n, sum), child| {
                let (p, _) = axis.split(child.widget.width(), child.widget.height());
                (n + 1, sum + p as i64)
            });
        let gaps = spacing(self.distribution, interior_primary, saturate(extent), count, primary_place);

        let mut offset = (actual_primary - primary_border) as i64;
        let mut gap_idx = count;
        for child in self.children.values_mut().rev() {
            let at = match child.fixed {
                Some(fixed) => origin.offset(fixed.col, fixed.row),
                None => {
                    let (p, c) = axis.split(child.widget.width(), child.widget.height());
                    offset -= gaps[gap_idx] as i64 + p as i64;
                    gap_idx = gap_idx.saturating_sub(1);
                    let cross = cross_border as i64 + cross_place.offset(interior_cross, c) as i64;
                    let (dc, dr) = axis.join(saturate(offset), saturate(cross));
                    origin.offset(dc, dr)
                }
            };
            child.widget.print_protocol(console, at, interior, mode);
        }
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

impl<A: LayoutAxis> BoxWidget for BoxContainer<A> {
    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn width(&self) -> i32 {
        if !self.dynamic_size {
            return self.frame.target_width();
        }
        self.frame.target_width().max(self.content_width())
    }

    fn height(&self) -> i32 {
        if !self.dynamic_size {
            return self.frame.target_height();
        }
        self.frame.target_height().max(self.content_height())
    }

    fn print_protocol(&mut self, console: &Console, pos: Position, container: Boundary, mode: DrawMode) -> Reply {
        let (width, height) = (self.width(), self.height());
        self.frame.place_sized(console.window_boundary(), pos, container, width, height);
        self.frame.paint_base(console, mode);
        self.paint_children(console, mode);
        self.frame.set_drawn(true);
        Reply::Continue
    }

    fn interact(&mut self, console: &Console, event: &MouseEvent) -> Reply {
        self.children
            .values_mut()
            .find(|child| child.widget.pos_in_bounds(event.position))
            .map_or(Reply::Ignored, |child| child.widget.interact(console, event))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::MemoryTerminal;
    use crate::types::{Alignment, FILL};
    use crate::widget::{Spacer, TextBox};
    use std::sync::Arc;

    fn setup(width: usize, height: usize) -> (Arc<Console>, MemoryTerminal) {
        let terminal = MemoryTerminal::new(width, height);
        (Console::new(Box::new(terminal.clone())), terminal)
    }

    #[test]
    fn test_insert_assigns_increasing_layers() {
        let mut c = VerticalContainer::new(10, 10);
        assert_eq!(c.insert(Spacer::new(1, 1)), 1);
        assert_eq!(c.insert(Spacer::new(1, 1)), 2);
        c.insert_at(10, Spacer::new(1, 1));
        assert_eq!(c.insert(Spacer::new(1, 1)), 11);
        assert_eq!(c.layers().collect::<Vec<_>>(), vec![1, 2, 10, 11]);
    }

    #[test]
    fn test_insert_at_replaces() {
        let mut c = HorizontalContainer::new(10, 1);
        c.insert_at(3, TextBox::new(2, 1, "old"));
        c.insert_at(3, TextBox::new(2, 1, "new"));
        assert_eq!(c.len(), 1);
        match c.get(3) {
            Some(Widget::Text(t)) => assert_eq!(t.text(), "new"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_remove_and_recent() {
        let mut c = VerticalContainer::new(5, 5);
        let layer = c.insert(Spacer::new(1, 1));
        assert!(c.recent_mut().is_some());
        assert!(c.remove(layer).is_some());
        assert!(c.recent_mut().is_none());
        assert!(c.remove(layer).is_none());
        assert!(c.is_empty());
    }

    #[test]
    fn test_dynamic_size_only_grows() {
        let mut c = VerticalContainer::new(4, 2);
        c.set_border_size(1);
        c.insert(Spacer::new(6, 2));
        c.insert(Spacer::new(3, 3));
        assert_eq!((c.width(), c.height()), (4, 2));

        c.set_dynamic_size(true);
        assert_eq!((c.content_width(), c.content_height()), (8, 7));
        assert_eq!((c.width(), c.height()), (8, 7));

        c.set_dimensions(20, 20);
        assert_eq!((c.width(), c.height()), (20, 20));
    }

    #[test]
    fn test_horizontal_content_size_sums_widths() {
        let mut c = HorizontalContainer::new(0, 0);
        c.insert(Spacer::new(2, 5));
        c.insert(Spacer::new(3, 1));
        assert_eq!((c.content_width(), c.content_height()), (5, 5));
    }

    #[test]
    fn test_vertical_even_spacing_example() {
        let (console, _) = setup(30, 12);
        let mut c = VerticalContainer::new(20, 10);
        c.set_border_size(1);
        for _ in 0..3 {
            c.insert(Spacer::new(1, 1));
        }
        c.draw(&console, Position::new(0, 0), console.window_boundary());

        let rows: Vec<i32> = c.layers().map(|l| c.get(l).unwrap().absolute_position().row).collect();
        assert_eq!(rows, vec![3, 5, 7]);
    }

    #[test]
    fn test_horizontal_packed_left_and_centered_cross() {
        let (console, terminal) = setup(10, 3);
        let mut c = HorizontalContainer::new(10, 3);
        c.set_distribution(Distribution::None);
        c.set_alignment(Alignment::LEFT | Alignment::MIDDLE);
        c.insert(TextBox::new(2, 1, "ab"));
        c.insert(TextBox::new(3, 1, "cde"));
        c.draw(&console, Position::new(0, 0), console.window_boundary());

        assert_eq!(terminal.row(1), "abcde     ");
    }

    #[test]
    fn test_fixed_child_uses_offset() {
        let (console, terminal) = setup(10, 4);
        let mut c = VerticalContainer::new(10, 4);
        c.insert_fixed(1, TextBox::new(2, 1, "xy"), Position::new(3, 2));
        c.draw(&console, Position::new(0, 0), console.window_boundary());
        assert_eq!(&terminal.row(2)[3..5], "xy");
        assert_eq!(c.fixed_offset(1), Some(Position::new(3, 2)));
    }

    #[test]
    fn test_fill_child_takes_interior() {
        let (console, _) = setup(12, 6);
        let mut c = VerticalContainer::new(FILL, FILL);
        c.set_border_size(1);
        c.insert(Spacer::new(FILL, FILL));
        c.draw(&console, Position::new(0, 0), console.window_boundary());

        let child = c.get(1).unwrap();
        assert_eq!(child.absolute_position(), Position::new(1, 1));
        assert_eq!((child.frame().actual_width(), child.frame().actual_height()), (10, 4));
    }

    #[test]
    fn test_interact_without_hit_is_ignored() {
        let (console, _) = setup(10, 4);
        let mut c = VerticalContainer::new(10, 4);
        c.insert(Spacer::new(2, 1));
        c.draw(&console, Position::new(0, 0), console.window_boundary());
        assert_eq!(c.interact(&console, &MouseEvent::click(Position::new(9, 0))), Reply::Ignored);
    }
}
