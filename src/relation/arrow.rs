//! Arrowhead geometry.

use crate::geometry::Point;

/// Filled triangle `tip -> left -> right`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowHead {
    pub tip: Point,
    pub left: Point,
    pub right: Point,
}

impl ArrowHead {
    pub fn points(&self) -> [Point; 3] {
        [self.tip, self.left, self.right]
    }
}

/// Arrowhead whose tip sits on `tip` and whose wings open toward `toward`.
///
/// The direction to `toward` is rotated by `±angle` and scaled to `length`.
/// Returns `None` when both points coincide and there is no direction.
pub fn arrow_head(tip: Point, toward: Point, angle: f64, length: f64) -> Option<ArrowHead> {
    // Move the origin onto the tip.
    let dx = toward.x - tip.x;
    let dy = toward.y - tip.y;
    let len = dx.hypot(dy);
    if len == 0.0 {
        return None;
    }
    let cos = dx / len;
    let sin = dy / len;
    let (sin_a, cos_a) = angle.sin_cos();

    let left = Point::new(
        length * (cos * cos_a - sin * sin_a),
        length * (sin * cos_a + cos * sin_a),
    );
    let right = Point::new(
        length * (cos * cos_a + sin * sin_a),
        length * (sin * cos_a - cos * sin_a),
    );

    Some(ArrowHead {
        tip,
        left: left.translate(tip.x, tip.y),
        right: right.translate(tip.x, tip.y),
    })
}
