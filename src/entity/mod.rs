//! Entity node: one database table drawn as a self-sizing card.

mod layout;

pub use layout::{LineShape, RectShape, Shape, TextShape, do_layout};

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::link::{LinkRegistry, Linkable};
use crate::measure::TextMetrics;
use crate::node::{Geometry, NodeId, Style};
use crate::schema::{ColumnSchema, EntitySchema};

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_FILL: &str = "#fee";

/// One column of the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub generated: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, typ: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            typ: typ.into(),
            length: None,
            primary: false,
            nullable: false,
            generated: false,
        }
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn generated(mut self) -> Self {
        self.generated = true;
        self
    }

    fn row_label(&self) -> String {
        format!("{}   {}", self.name, self.typ)
    }
}

/// Construction parameters coming from the editing surface.
#[derive(Debug, Clone)]
pub struct EntityOptions {
    pub id: Option<NodeId>,
    pub title: String,
    pub fields: Vec<Field>,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub fill: String,
    pub stroke: String,
    pub padding: f64,
    pub linkable: bool,
}

impl Default for EntityOptions {
    fn default() -> Self {
        Self {
            id: None,
            title: DEFAULT_TITLE.to_string(),
            fields: Vec::new(),
            left: 0.0,
            top: 0.0,
            width: 200.0,
            height: 100.0,
            angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            fill: DEFAULT_FILL.to_string(),
            stroke: "black".to_string(),
            padding: 0.0,
            linkable: true,
        }
    }
}

impl EntityOptions {
    pub fn new(title: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            title: title.into(),
            fields,
            ..Self::default()
        }
    }

    pub fn at(mut self, left: f64, top: f64) -> Self {
        self.left = left;
        self.top = top;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    id: NodeId,
    pub title: String,
    pub fields: Vec<Field>,
    /// Selection padding, persisted but not used by the layout.
    pub padding: f64,
    linkable: bool,
    pub geometry: Geometry,
    pub style: Style,
    children: Vec<Shape>,
    links: LinkRegistry,
    metrics: TextMetrics,
}

impl Entity {
    pub fn new(options: EntityOptions) -> Self {
        Self::with_metrics(options, TextMetrics::default())
    }

    pub fn with_metrics(options: EntityOptions, metrics: TextMetrics) -> Self {
        let background = Shape::Rect(RectShape {
            left: 0.0,
            top: 0.0,
            width: options.width,
            height: options.height,
            fill: options.fill.clone(),
            stroke: options.stroke.clone(),
        });
        let mut entity = Self {
            id: options.id.unwrap_or_else(NodeId::generate),
            title: options.title,
            fields: options.fields,
            padding: options.padding,
            linkable: options.linkable,
            geometry: Geometry {
                left: options.left,
                top: options.top,
                width: options.width,
                height: options.height,
                angle: options.angle,
                scale_x: options.scale_x,
                scale_y: options.scale_y,
            },
            style: Style {
                fill: options.fill,
                stroke: options.stroke,
                ..Style::default()
            },
            children: vec![background],
            links: LinkRegistry::default(),
            metrics,
        };
        entity.rebuild_rows();
        entity
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn inner_padding(&self) -> f64 {
        self.metrics.inner_padding
    }

    pub fn children(&self) -> &[Shape] {
        &self.children
    }

    pub fn background(&self) -> Option<&RectShape> {
        match self.children.first() {
            Some(Shape::Rect(r)) => Some(r),
            _ => None,
        }
    }

    /// Append a primitive and lay the card out again.
    pub fn add_with_update(&mut self, shape: Shape) {
        self.children.push(shape);
        self.update_layout();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.rebuild_rows();
    }

    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
        self.rebuild_rows();
    }

    /// Remove the first field called `name`.
    pub fn remove_field(&mut self, name: &str) -> Option<Field> {
        let index = self.fields.iter().position(|f| f.name == name)?;
        let removed = self.fields.remove(index);
        self.rebuild_rows();
        Some(removed)
    }

    /// Replace the first field called `name`, keeping its position.
    pub fn update_field(&mut self, name: &str, field: Field) -> bool {
        let Some(slot) = self.fields.iter_mut().find(|f| f.name == name) else {
            return false;
        };
        *slot = field;
        self.rebuild_rows();
        true
    }

    pub fn move_to(&mut self, left: f64, top: f64) {
        self.geometry.left = left;
        self.geometry.top = top;
    }

    /// `{name, columns}` keyed by field name, in field order.
    pub fn to_schema_fragment(&self) -> EntitySchema {
        let mut schema = EntitySchema::new(self.title.clone());
        for field in &self.fields {
            schema
                .columns
                .insert(field.name.clone(), ColumnSchema::from(field));
        }
        schema
    }

    /// Drop every row and rebuild title, separator and fields.
    /// The background keeps its current size.
    fn rebuild_rows(&mut self) {
        self.children.truncate(1);
        let pad = self.metrics.inner_padding;
        let rows: Vec<Shape> = std::iter::once(Shape::Text(TextShape::new(
            self.title.clone(),
            self.metrics.title_font_size,
            &self.metrics,
        )))
        .chain(std::iter::once(Shape::Line(LineShape::new(
            200.0 + pad,
            self.style.stroke.clone(),
        ))))
        .chain(self.fields.iter().map(|field| {
            Shape::Text(TextShape::new(
                field.row_label(),
                self.metrics.field_font_size,
                &self.metrics,
            ))
        }))
        .collect();
        self.children.extend(rows);
        self.update_layout();
    }

    fn update_layout(&mut self) {
        do_layout(&mut self.children, self.metrics.inner_padding);
        if let Some(bg) = self.background() {
            let (width, height) = (bg.width, bg.height);
            self.geometry.width = width;
            self.geometry.height = height;
        }
    }
}

impl Linkable for Entity {
    fn node_id(&self) -> &NodeId {
        &self.id
    }

    fn type_name(&self) -> &'static str {
        "Entity"
    }

    fn is_linkable(&self) -> bool {
        self.linkable
    }

    fn links(&self) -> &LinkRegistry {
        &self.links
    }

    fn links_mut(&mut self) -> &mut LinkRegistry {
        &mut self.links
    }

    fn link_anchor(&self) -> Point {
        self.geometry.center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> Entity {
        Entity::new(EntityOptions::new(
            "User",
            vec![
                Field::new("id", "int").primary().generated(),
                Field::new("email", "varchar").length(255),
            ],
        ))
    }

    #[test]
    fn test_children_order() {
        let e = user();
        let kids = e.children();
        assert_eq!(kids.len(), 5);
        assert!(matches!(kids[0], Shape::Rect(_)));
        assert!(matches!(&kids[1], Shape::Text(t) if t.text == "User"));
        assert!(matches!(kids[2], Shape::Line(_)));
        assert!(matches!(&kids[3], Shape::Text(t) if t.text == "id   int"));
        assert!(matches!(&kids[4], Shape::Text(t) if t.text == "email   varchar"));
    }

    #[test]
    fn test_geometry_tracks_background() {
        let e = user();
        let bg = e.background().unwrap();
        assert_eq!(e.geometry.width, bg.width);
        assert_eq!(e.geometry.height, bg.height);
    }

    #[test]
    fn test_adding_fields_grows_card() {
        let mut e = user();
        let before = e.geometry.height;
        for i in 0..10 {
            e.add_field(Field::new(format!("col_{i}"), "int"));
        }
        assert!(e.geometry.height > before);
        assert_eq!(e.children().len(), 3 + 12);
    }

    #[test]
    fn test_remove_and_update_field() {
        let mut e = user();
        assert!(e.update_field("email", Field::new("mail", "text")));
        assert!(!e.update_field("missing", Field::new("x", "int")));
        assert_eq!(e.fields[1].name, "mail");

        let removed = e.remove_field("id").unwrap();
        assert_eq!(removed.name, "id");
        assert!(e.remove_field("id").is_none());
        assert_eq!(e.children().len(), 4);
    }

    #[test]
    fn test_add_with_update_relayouts() {
        let mut e = user();
        let extra = TextShape::new("note   text", 18.0, &TextMetrics::default());
        e.add_with_update(Shape::Text(extra));
        let last = e.children().last().unwrap().bounds();
        assert!(last.top > e.children()[4].bounds().top);
    }

    #[test]
    fn test_schema_fragment() {
        let schema = user().to_schema_fragment();
        assert_eq!(schema.name, "User");
        let keys: Vec<&str> = schema.columns.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "email"]);
        assert!(schema.columns["id"].primary);
        assert_eq!(schema.columns["email"].length, Some(255));
        assert!(schema.relations.is_empty());
    }

    #[test]
    fn test_link_anchor_is_center() {
        let mut e = user();
        e.move_to(100.0, 50.0);
        let c = e.link_anchor();
        assert_eq!(c.x, 100.0 + e.geometry.width / 2.0);
        assert_eq!(c.y, 50.0 + e.geometry.height / 2.0);
    }

    #[test]
    fn test_field_wire_format() {
        let field: Field = serde_json::from_value(serde_json::json!({
            "name": "email",
            "type": "varchar",
            "length": 255
        }))
        .unwrap();
        assert_eq!(field, Field::new("email", "varchar").length(255));

        let value = serde_json::to_value(Field::new("id", "int").primary()).unwrap();
        assert_eq!(value["type"], "int");
        assert_eq!(value["primary"], true);
        assert!(value.get("length").is_none());
    }
}
