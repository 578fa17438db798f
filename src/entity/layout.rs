//! Card primitives and the stacking layout of an entity.
//!
//! Coordinates are local to the entity: the background rectangle is created
//! at the origin and every other child is placed relative to it.

use crate::geometry::Rect;
use crate::measure::TextMetrics;

#[derive(Debug, Clone, PartialEq)]
pub struct RectShape {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub stroke: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextShape {
    pub text: String,
    pub font_size: f64,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl TextShape {
    pub fn new(text: impl Into<String>, font_size: f64, metrics: &TextMetrics) -> Self {
        let text = text.into();
        let (width, height) = metrics.text_size(&text, font_size);
        Self {
            text,
            font_size,
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }
}

/// Horizontal rule. `x1`/`x2` are offsets from `left`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineShape {
    pub left: f64,
    pub top: f64,
    pub x1: f64,
    pub x2: f64,
    pub stroke: String,
    pub stroke_width: f64,
}

impl LineShape {
    pub fn new(length: f64, stroke: impl Into<String>) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            x1: 0.0,
            x2: length,
            stroke: stroke.into(),
            stroke_width: 1.0,
        }
    }
}

/// Rendering primitive held by an entity card.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(RectShape),
    Text(TextShape),
    Line(LineShape),
}

impl Shape {
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rect(r) => Rect::new(r.left, r.top, r.width, r.height),
            Shape::Text(t) => Rect::new(t.left, t.top, t.width, t.height),
            Shape::Line(l) => Rect::new(
                l.left + l.x1.min(l.x2),
                l.top,
                (l.x2 - l.x1).abs(),
                l.stroke_width,
            ),
        }
    }

    fn move_to(&mut self, left: f64, top: f64) {
        match self {
            Shape::Rect(r) => {
                r.left = left;
                r.top = top;
            }
            Shape::Text(t) => {
                t.left = left;
                t.top = top;
            }
            Shape::Line(l) => {
                l.left = left;
                l.top = top;
            }
        }
    }
}

/// Stack rows under the background and grow it to fit.
///
/// Child 0 is the background, child 2 the separator under the title. Rows
/// are laid out top to bottom, each separated by `inner_padding`; the
/// background and separator only ever grow.
pub fn do_layout(children: &mut [Shape], inner_padding: f64) {
    if children.len() < 2 {
        return;
    }
    let (background, rows) = children.split_at_mut(1);
    let Shape::Rect(bg) = &mut background[0] else {
        return;
    };

    // Step 1: stack rows.
    let mut total_height = 0.0;
    let mut max_width: f64 = 0.0;
    for row in rows.iter_mut() {
        let bounds = row.bounds();
        total_height += bounds.height + inner_padding;
        max_width = max_width.max(bounds.width);

        // Bottom of the row lands on the running offset.
        let top = bg.top + total_height - bounds.height;
        let left = match row {
            Shape::Line(_) => bg.left,
            _ => bg.left + inner_padding,
        };
        row.move_to(left, top);
    }

    // Step 2: background.
    if max_width > bg.width {
        bg.width = max_width;
    }
    if total_height > bg.height {
        bg.height = total_height;
    }

    // Step 3: separator.
    if let Some(Shape::Line(separator)) = rows.get_mut(1) {
        if max_width > separator.x2 {
            separator.x2 = max_width + inner_padding;
        }
    }

    // Inset rows and the widened separator must stay inside the box.
    let right_edge = rows
        .iter()
        .map(|row| row.bounds().right() - bg.left)
        .fold(0.0, f64::max);
    if right_edge > bg.width {
        bg.width = right_edge;
    }
}
