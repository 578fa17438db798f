//! Shared node attributes and the closed set of diagram node kinds.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::Entity;
use crate::geometry::{Point, Rect};
use crate::link::Linkable;
use crate::relation::Relation;

/// Stable node identifier, the only cross-reference key on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn generate() -> Self {
        Self(format!("node-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discriminant of [`Node`], also the `type` tag on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Entity,
    Relation,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entity => "Entity",
            Self::Relation => "Relation",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placement of a node. Rotation and scale pivot on the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees, clockwise.
    pub angle: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
            angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl Geometry {
    /// Transformed corners, clockwise from the top-left.
    pub fn corners(&self) -> [Point; 4] {
        let w = self.width * self.scale_x;
        let h = self.height * self.scale_y;
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let place = |x: f64, y: f64| {
            Point::new(self.left + x * cos - y * sin, self.top + x * sin + y * cos)
        };
        [place(0.0, 0.0), place(w, 0.0), place(w, h), place(0.0, h)]
    }

    /// Axis-aligned box around the transformed node.
    pub fn bounding_rect(&self) -> Rect {
        let corners = self.corners();
        Rect::enclosing(&corners).unwrap_or_default()
    }

    pub fn center(&self) -> Point {
        self.bounding_rect().center()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub opacity: f64,
    pub visible: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: "#000".to_string(),
            stroke: "#000".to_string(),
            stroke_width: 1.0,
            opacity: 1.0,
            visible: true,
        }
    }
}

/// Every element a scene can hold.
#[derive(Debug, Clone)]
pub enum Node {
    Entity(Entity),
    Relation(Relation),
}

impl Node {
    pub fn id(&self) -> &NodeId {
        match self {
            Node::Entity(e) => e.id(),
            Node::Relation(r) => r.id(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Entity(_) => NodeKind::Entity,
            Node::Relation(_) => NodeKind::Relation,
        }
    }

    pub fn bounding_rect(&self) -> Rect {
        match self {
            Node::Entity(e) => e.geometry.bounding_rect(),
            Node::Relation(r) => r.bounding_rect(),
        }
    }

    /// Title used for denormalized endpoint names.
    pub fn title(&self) -> &str {
        match self {
            Node::Entity(e) => &e.title,
            Node::Relation(r) => &r.title,
        }
    }

    pub fn as_linkable(&self) -> Option<&dyn Linkable> {
        match self {
            Node::Entity(e) => Some(e),
            Node::Relation(_) => None,
        }
    }

    pub fn as_linkable_mut(&mut self) -> Option<&mut dyn Linkable> {
        match self {
            Node::Entity(e) => Some(e),
            Node::Relation(_) => None,
        }
    }

    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Node::Entity(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_entity_mut(&mut self) -> Option<&mut Entity> {
        match self {
            Node::Entity(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_relation(&self) -> Option<&Relation> {
        match self {
            Node::Relation(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_relation_mut(&mut self) -> Option<&mut Relation> {
        match self {
            Node::Relation(r) => Some(r),
            _ => None,
        }
    }
}
