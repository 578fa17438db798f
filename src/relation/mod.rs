//! Relation edge: a directed line between two linkable nodes.

mod arrow;

pub use arrow::{ArrowHead, arrow_head};

use std::f64::consts::FRAC_PI_8;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};
use crate::link::LinkEnd;
use crate::node::{NodeId, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationType {
    #[default]
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneToOne => "one-to-one",
            Self::OneToMany => "one-to-many",
            Self::ManyToOne => "many-to-one",
            Self::ManyToMany => "many-to-many",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "one-to-one" => Some(Self::OneToOne),
            "one-to-many" => Some(Self::OneToMany),
            "many-to-one" => Some(Self::ManyToOne),
            "many-to-many" => Some(Self::ManyToMany),
            _ => None,
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which ends of the line carry an arrowhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowType {
    Start,
    #[default]
    End,
    Both,
    None,
}

impl ArrowType {
    pub fn has_start(&self) -> bool {
        matches!(self, Self::Start | Self::Both)
    }

    pub fn has_end(&self) -> bool {
        matches!(self, Self::End | Self::Both)
    }
}

/// Construction parameters coming from the editing surface.
#[derive(Debug, Clone)]
pub struct RelationOptions {
    pub id: Option<NodeId>,
    pub title: String,
    pub points: [f64; 4],
    pub stroke: String,
    pub stroke_width: f64,
    pub fill: String,
    pub arrow_type: ArrowType,
    pub relation_type: RelationType,
    pub referenced_column_name: String,
    pub arrow_angle: f64,
    /// Defaults to `stroke_width + 15`.
    pub arrow_length: Option<f64>,
}

impl Default for RelationOptions {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            points: [0.0; 4],
            stroke: "#000".to_string(),
            stroke_width: 1.0,
            fill: "#000".to_string(),
            arrow_type: ArrowType::End,
            relation_type: RelationType::OneToOne,
            referenced_column_name: "id".to_string(),
            arrow_angle: FRAC_PI_8,
            arrow_length: None,
        }
    }
}

impl RelationOptions {
    pub fn new(relation_type: RelationType) -> Self {
        Self {
            relation_type,
            ..Self::default()
        }
    }
}

/// Compact relation description handed to schema tooling.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationSummary {
    pub title: String,
    pub from_id: String,
    pub to_id: String,
    pub relation_type: RelationType,
    pub referenced_column_name: String,
}

#[derive(Debug, Clone)]
pub struct Relation {
    id: NodeId,
    pub title: String,
    from: Option<NodeId>,
    to: Option<NodeId>,
    /// Title of the `from` node at the time it was attached.
    pub from_name: String,
    pub to_name: String,
    pub relation_type: RelationType,
    /// Only meaningful for one-to-one.
    pub referenced_column_name: String,
    pub arrow_type: ArrowType,
    pub arrow_angle: f64,
    pub arrow_length: f64,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub style: Style,
}

impl Relation {
    pub fn new(options: RelationOptions) -> Self {
        let [x1, y1, x2, y2] = options.points;
        Self {
            id: options.id.unwrap_or_else(NodeId::generate),
            title: options.title,
            from: None,
            to: None,
            from_name: String::new(),
            to_name: String::new(),
            relation_type: options.relation_type,
            referenced_column_name: options.referenced_column_name,
            arrow_type: options.arrow_type,
            arrow_angle: options.arrow_angle,
            arrow_length: options
                .arrow_length
                .unwrap_or(options.stroke_width + 15.0),
            x1,
            y1,
            x2,
            y2,
            style: Style {
                fill: options.fill,
                stroke: options.stroke,
                stroke_width: options.stroke_width,
                ..Style::default()
            },
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Node the relation currently leaves from.
    pub fn link_from(&self) -> Option<&NodeId> {
        self.from.as_ref()
    }

    /// Node the relation currently points to.
    pub fn link_to(&self) -> Option<&NodeId> {
        self.to.as_ref()
    }

    pub fn link(&self, end: LinkEnd) -> Option<&NodeId> {
        match end {
            LinkEnd::From => self.from.as_ref(),
            LinkEnd::To => self.to.as_ref(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }

    pub fn is_detached(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Record an attached endpoint. Only the scene calls this, right after
    /// registering the relation on the node, which keeps both sides in step.
    pub(crate) fn attach(&mut self, end: LinkEnd, node: NodeId, name: String) {
        match end {
            LinkEnd::From => {
                self.from = Some(node);
                self.from_name = name;
            }
            LinkEnd::To => {
                self.to = Some(node);
                self.to_name = name;
            }
        }
    }

    pub(crate) fn detach(&mut self, end: LinkEnd) -> Option<NodeId> {
        match end {
            LinkEnd::From => {
                self.from_name.clear();
                self.from.take()
            }
            LinkEnd::To => {
                self.to_name.clear();
                self.to.take()
            }
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    pub fn set_endpoint(&mut self, end: LinkEnd, point: Point) {
        match end {
            LinkEnd::From => {
                self.x1 = point.x;
                self.y1 = point.y;
            }
            LinkEnd::To => {
                self.x2 = point.x;
                self.y2 = point.y;
            }
        }
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::enclosing(&[self.start(), self.end()]).unwrap_or_default()
    }

    /// Arrowhead at the start of the line. With a `from` rectangle the tip
    /// sits where the line crosses its rim (moved by `rim_offset`).
    pub fn start_arrow(&self, from_rect: Option<&Rect>, rim_offset: f64) -> Option<ArrowHead> {
        let tip = from_rect
            .and_then(|r| r.rim_intersection(self.x1, self.y1, self.x2, self.y2, rim_offset))
            .unwrap_or_else(|| self.start());
        arrow_head(tip, self.end(), self.arrow_angle, self.arrow_length)
    }

    /// Arrowhead at the end of the line, shifted by half the stroke so it
    /// lines up with thick strokes.
    pub fn end_arrow(&self, to_rect: Option<&Rect>, rim_offset: f64) -> Option<ArrowHead> {
        let half = self.style.stroke_width / 2.0;
        let tip = to_rect
            .and_then(|r| r.rim_intersection(self.x1, self.y1, self.x2, self.y2, rim_offset))
            .unwrap_or_else(|| self.end());
        arrow_head(
            tip.translate(half, half),
            self.start().translate(half, half),
            self.arrow_angle,
            self.arrow_length,
        )
    }

    /// Arrowheads requested by `arrow_type`, start first.
    pub fn arrow_heads(
        &self,
        from_rect: Option<&Rect>,
        to_rect: Option<&Rect>,
        rim_offset: f64,
    ) -> Vec<ArrowHead> {
        let mut heads = Vec::new();
        if self.arrow_type.has_start() {
            heads.extend(self.start_arrow(from_rect, rim_offset));
        }
        if self.arrow_type.has_end() {
            heads.extend(self.end_arrow(to_rect, rim_offset));
        }
        heads
    }

    pub fn summary(&self) -> RelationSummary {
        RelationSummary {
            title: self.title.clone(),
            from_id: self.from.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            to_id: self.to.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            relation_type: self.relation_type,
            referenced_column_name: self.referenced_column_name.clone(),
        }
    }
}
