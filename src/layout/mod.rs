//! Layout Module - box containers and gap distribution
//!
//! Containers own their children, size themselves (fixed target or grown
//! to fit), and place dynamic children along one axis:
//!
//! - **HorizontalContainer** - children left to right
//! - **VerticalContainer** - children top to bottom
//!
//! # Example
//!
//! ```
//! use boxterm::layout::VerticalContainer;
//! use boxterm::widget::{BoxWidget, Spacer};
//!
//! let mut column = VerticalContainer::new(20, 10);
//! column.set_border_size(1);
//! let first = column.insert(Spacer::new(5, 1));
//! let second = column.insert(Spacer::new(5, 1));
//! assert_eq!((first, second), (1, 2));
//! ```

mod container;
mod distribution;

pub use container::{Axis, BoxContainer, Horizontal, HorizontalContainer, LayoutAxis, Vertical, VerticalContainer};
pub use distribution::spacing;
