//! Persisted diagram document and the two-pass load.
//!
//! Loading first turns every record into a node ([`RawScene`]); relation
//! endpoints are only wired up by [`RawScene::resolve`], once every node
//! exists.

use std::collections::HashSet;
use std::f64::consts::FRAC_PI_8;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::entity::{DEFAULT_FILL, DEFAULT_TITLE, Entity, EntityOptions, Field};
use crate::link::{LinkEnd, Linkable};
use crate::node::{Geometry, Node, NodeId, Style};
use crate::relation::{ArrowType, Relation, RelationOptions, RelationType};
use crate::scene::{Scene, SceneError};

pub const FORMAT_VERSION: &str = "1";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid diagram document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown object type {0:?}")]
    UnknownType(String),
    #[error("relation {relation} references missing node {target} on its {end:?} end")]
    Unresolved {
        relation: NodeId,
        end: LinkEnd,
        target: NodeId,
    },
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// How to treat references and records that cannot be restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// Drop them with a warning and report them.
    #[default]
    Lenient,
    /// Fail the load.
    Strict,
}

fn default_version() -> String {
    FORMAT_VERSION.to_string()
}

fn default_color() -> String {
    "#000".to_string()
}

fn default_entity_fill() -> String {
    DEFAULT_FILL.to_string()
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_column() -> String {
    "id".to_string()
}

fn default_arrow_angle() -> f64 {
    FRAC_PI_8
}

fn one() -> f64 {
    1.0
}

fn yes() -> bool {
    true
}

fn empty_as_none<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NodeId>, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(raw.filter(|s| !s.is_empty()).map(NodeId::from))
}

fn none_as_empty<S: Serializer>(id: &Option<NodeId>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(id.as_ref().map(NodeId::as_str).unwrap_or(""))
}

/// Geometry and style fields every object carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonRecord {
    #[serde(default = "NodeId::generate")]
    pub id: NodeId,
    #[serde(default = "yes")]
    pub linkable: bool,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default = "default_color")]
    pub stroke: String,
    #[serde(default = "one")]
    pub stroke_width: f64,
    #[serde(default = "one")]
    pub scale_x: f64,
    #[serde(default = "one")]
    pub scale_y: f64,
    #[serde(default)]
    pub angle: f64,
    #[serde(default = "one")]
    pub opacity: f64,
    #[serde(default = "yes")]
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    #[serde(flatten)]
    pub common: CommonRecord,
    #[serde(default = "default_entity_fill")]
    pub fill: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub padding: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationRecord {
    #[serde(flatten)]
    pub common: CommonRecord,
    #[serde(default = "default_color")]
    pub fill: String,
    #[serde(default)]
    pub title: String,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        serialize_with = "none_as_empty"
    )]
    pub from_id: Option<NodeId>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        serialize_with = "none_as_empty"
    )]
    pub to_id: Option<NodeId>,
    #[serde(default)]
    pub from_name: String,
    #[serde(default)]
    pub to_name: String,
    #[serde(default = "default_column")]
    pub referenced_column_name: String,
    #[serde(default)]
    pub relation_type: RelationType,
    #[serde(default)]
    pub arrow_type: ArrowType,
    #[serde(default = "default_arrow_angle", alias = "arrowAngel")]
    pub arrow_angle: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow_length: Option<f64>,
    #[serde(default)]
    pub x1: f64,
    #[serde(default)]
    pub y1: f64,
    #[serde(default)]
    pub x2: f64,
    #[serde(default)]
    pub y2: f64,
}

/// One element of `objects`, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectRecord {
    Entity(EntityRecord),
    Relation(RelationRecord),
    /// Any other object type, kept verbatim.
    Unknown { kind: String, raw: Value },
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum KnownRecord<'a> {
    Entity(&'a EntityRecord),
    Relation(&'a RelationRecord),
}

impl Serialize for ObjectRecord {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            ObjectRecord::Entity(r) => KnownRecord::Entity(r).serialize(s),
            ObjectRecord::Relation(r) => KnownRecord::Relation(r).serialize(s),
            ObjectRecord::Unknown { raw, .. } => raw.serialize(s),
        }
    }
}

impl<'de> Deserialize<'de> for ObjectRecord {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(d)?;
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        match kind.as_str() {
            "Entity" => EntityRecord::deserialize(value)
                .map(ObjectRecord::Entity)
                .map_err(de::Error::custom),
            "Relation" => RelationRecord::deserialize(value)
                .map(ObjectRecord::Relation)
                .map_err(de::Error::custom),
            _ => Ok(ObjectRecord::Unknown { kind, raw: value }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub objects: Vec<ObjectRecord>,
}

impl Document {
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn common_of(id: &NodeId, linkable: bool, geometry: &Geometry, style: &Style) -> CommonRecord {
    CommonRecord {
        id: id.clone(),
        linkable,
        left: geometry.left,
        top: geometry.top,
        width: geometry.width,
        height: geometry.height,
        stroke: style.stroke.clone(),
        stroke_width: style.stroke_width,
        scale_x: geometry.scale_x,
        scale_y: geometry.scale_y,
        angle: geometry.angle,
        opacity: style.opacity,
        visible: style.visible,
    }
}

impl From<&Entity> for EntityRecord {
    fn from(entity: &Entity) -> Self {
        Self {
            common: common_of(entity.id(), entity.is_linkable(), &entity.geometry, &entity.style),
            fill: entity.style.fill.clone(),
            title: entity.title.clone(),
            fields: entity.fields.clone(),
            padding: entity.padding,
        }
    }
}

impl From<&Relation> for RelationRecord {
    fn from(relation: &Relation) -> Self {
        let bounds = relation.bounding_rect();
        let geometry = Geometry {
            left: bounds.left,
            top: bounds.top,
            width: bounds.width,
            height: bounds.height,
            ..Geometry::default()
        };
        Self {
            common: common_of(relation.id(), false, &geometry, &relation.style),
            fill: relation.style.fill.clone(),
            title: relation.title.clone(),
            from_id: relation.link_from().cloned(),
            to_id: relation.link_to().cloned(),
            from_name: relation.from_name.clone(),
            to_name: relation.to_name.clone(),
            referenced_column_name: relation.referenced_column_name.clone(),
            relation_type: relation.relation_type,
            arrow_type: relation.arrow_type,
            arrow_angle: relation.arrow_angle,
            arrow_length: Some(relation.arrow_length),
            x1: relation.x1,
            y1: relation.y1,
            x2: relation.x2,
            y2: relation.y2,
        }
    }
}

impl EntityRecord {
    fn into_entity(self) -> Entity {
        let c = self.common;
        let mut entity = Entity::new(EntityOptions {
            id: Some(c.id),
            title: self.title,
            fields: self.fields,
            left: c.left,
            top: c.top,
            width: c.width,
            height: c.height,
            angle: c.angle,
            scale_x: c.scale_x,
            scale_y: c.scale_y,
            fill: self.fill,
            stroke: c.stroke,
            padding: self.padding,
            linkable: c.linkable,
        });
        entity.style.stroke_width = c.stroke_width;
        entity.style.opacity = c.opacity;
        entity.style.visible = c.visible;
        entity
    }
}

impl RelationRecord {
    /// The relation with its coordinates but no endpoints, plus the ids
    /// it should be attached to.
    fn into_relation(self) -> (Relation, PendingLinks) {
        let c = self.common;
        let mut relation = Relation::new(RelationOptions {
            id: Some(c.id),
            title: self.title,
            points: [self.x1, self.y1, self.x2, self.y2],
            stroke: c.stroke,
            stroke_width: c.stroke_width,
            fill: self.fill,
            arrow_type: self.arrow_type,
            relation_type: self.relation_type,
            referenced_column_name: self.referenced_column_name,
            arrow_angle: self.arrow_angle,
            arrow_length: self.arrow_length,
        });
        relation.style.opacity = c.opacity;
        relation.style.visible = c.visible;
        let pending = PendingLinks {
            relation: relation.id().clone(),
            from: self.from_id,
            to: self.to_id,
        };
        (relation, pending)
    }
}

impl Scene {
    /// Snapshot every node in draw order. Relations with no endpoint at
    /// all are left out.
    pub fn to_document(&self) -> Document {
        let objects = self
            .nodes()
            .filter_map(|node| match node {
                Node::Entity(e) => Some(ObjectRecord::Entity(e.into())),
                Node::Relation(r) if r.is_detached() => {
                    warn!("Relation {} has no endpoints, not saved.", r.id());
                    None
                }
                Node::Relation(r) => Some(ObjectRecord::Relation(r.into())),
            })
            .collect();
        Document {
            version: default_version(),
            objects,
        }
    }

    pub fn serialize(&self) -> Result<String, DocumentError> {
        self.to_document().to_json()
    }

    /// Both passes in one go.
    pub fn deserialize(json: &str, mode: ResolveMode) -> Result<Resolved, DocumentError> {
        RawScene::from_json(json)?.resolve(mode)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PendingLinks {
    relation: NodeId,
    from: Option<NodeId>,
    to: Option<NodeId>,
}

/// Relation endpoint that named a node the scene could not attach.
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedLink {
    pub relation: NodeId,
    pub end: LinkEnd,
    pub target: NodeId,
}

/// Outcome of [`RawScene::resolve`].
#[derive(Debug)]
pub struct Resolved {
    pub scene: Scene,
    pub unresolved: Vec<UnresolvedLink>,
    /// Type tags of objects that were not restored.
    pub skipped: Vec<String>,
}

/// Every node of a document, instantiated but not yet linked.
#[derive(Debug, Clone)]
pub struct RawScene {
    nodes: Vec<Node>,
    pending: Vec<PendingLinks>,
    unknown: Vec<String>,
}

impl RawScene {
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(Self::from_document(Document::from_json(json)?))
    }

    pub fn from_document(document: Document) -> Self {
        let mut raw = Self {
            nodes: Vec::with_capacity(document.objects.len()),
            pending: Vec::new(),
            unknown: Vec::new(),
        };
        for object in document.objects {
            match object {
                ObjectRecord::Entity(record) => raw.nodes.push(Node::Entity(record.into_entity())),
                ObjectRecord::Relation(record) => {
                    let (relation, pending) = record.into_relation();
                    raw.nodes.push(Node::Relation(relation));
                    raw.pending.push(pending);
                }
                ObjectRecord::Unknown { kind, .. } => raw.unknown.push(kind),
            }
        }
        raw
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Insert every node, then attach relation endpoints.
    pub fn resolve(self, mode: ResolveMode) -> Result<Resolved, DocumentError> {
        if mode == ResolveMode::Strict {
            if let Some(kind) = self.unknown.first() {
                return Err(DocumentError::UnknownType(kind.clone()));
            }
        }
        for kind in &self.unknown {
            warn!("Skipping object of unknown type {:?}.", kind);
        }

        let mut scene = Scene::new();
        // Relations that made it into the scene; links of skipped ones are dropped.
        let mut accepted = HashSet::new();
        for node in self.nodes {
            let relation = node.as_relation().map(|r| r.id().clone());
            match scene.insert_node(node) {
                Ok(()) => accepted.extend(relation),
                Err(err) if mode == ResolveMode::Lenient => warn!("Skipping node: {}.", err),
                Err(err) => return Err(err.into()),
            }
        }

        let mut unresolved = Vec::new();
        for pending in self.pending {
            if !accepted.contains(&pending.relation) {
                debug!("dropping links of skipped relation {}", pending.relation);
                continue;
            }
            let ends = [(LinkEnd::From, pending.from), (LinkEnd::To, pending.to)];
            for (end, target) in ends {
                let Some(target) = target else { continue };
                let attached = if scene.contains(&target) {
                    match scene.set_link(&pending.relation, end, &target) {
                        Ok(attached) => attached,
                        Err(err) if mode == ResolveMode::Lenient => {
                            warn!("Cannot attach relation {}: {}.", pending.relation, err);
                            false
                        }
                        Err(err) => return Err(err.into()),
                    }
                } else {
                    false
                };
                if attached {
                    continue;
                }
                if mode == ResolveMode::Strict {
                    return Err(DocumentError::Unresolved {
                        relation: pending.relation,
                        end,
                        target,
                    });
                }
                warn!(
                    "Relation {} references missing node {}.",
                    pending.relation, target
                );
                unresolved.push(UnresolvedLink {
                    relation: pending.relation.clone(),
                    end,
                    target,
                });
            }
        }

        debug!(
            "resolved {} nodes, {} unresolved links",
            scene.len(),
            unresolved.len()
        );
        scene.take_redraw();
        Ok(Resolved {
            scene,
            unresolved,
            skipped: self.unknown,
        })
    }
}
