//! 2-D geometry primitives: segments, rectangles and rim intersection.

mod rect;
mod vector;

pub use rect::Rect;
pub use vector::{Point, Vector};
