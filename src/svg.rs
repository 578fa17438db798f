use crate::entity::{Entity, Shape};
use crate::geometry::Rect;
use crate::node::{Node, NodeId};
use crate::relation::{ArrowHead, Relation};
use crate::scene::Scene;
use std::fmt::Write;

pub struct SvgRenderer {
    /// Blank space around the drawing.
    pub margin: f64,
    /// Arrow tips sit this far outside the rim; negative moves them inside.
    pub rim_offset: f64,
    pub font_family: String,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            margin: 20.0,
            rim_offset: -6.0,
            font_family: "monospace".to_string(),
        }
    }
}

impl SvgRenderer {
    pub fn render(&self, scene: &Scene) -> String {
        let mut svg = String::new();

        let bounds = scene
            .nodes()
            .filter(|n| is_visible(n))
            .map(Node::bounding_rect)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();
        let x = bounds.left - self.margin;
        let y = bounds.top - self.margin;
        let width = bounds.width + self.margin * 2.0;
        let height = bounds.height + self.margin * 2.0;

        writeln!(
            &mut svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}">"#,
            width, height, x, y, width, height
        )
        .unwrap();

        writeln!(
            &mut svg,
            r#"<style>
  .entity-title {{ font-family: {font}; font-weight: bold; }}
  .field-text {{ font-family: {font}; }}
  .relation-label {{ font-family: {font}; font-size: 12px; }}
</style>"#,
            font = self.font_family
        )
        .unwrap();

        // Scene order is draw order, relations already sit behind their nodes.
        for node in scene.nodes().filter(|n| is_visible(n)) {
            match node {
                Node::Entity(entity) => self.render_entity(&mut svg, entity),
                Node::Relation(relation) => self.render_relation(&mut svg, scene, relation),
            }
        }

        writeln!(&mut svg, "</svg>").unwrap();
        svg
    }

    fn render_entity(&self, svg: &mut String, entity: &Entity) {
        let g = &entity.geometry;
        writeln!(
            svg,
            r#"<g id="{}" transform="translate({} {}) rotate({}) scale({} {})" opacity="{}">"#,
            escape_xml(entity.id().as_str()),
            g.left,
            g.top,
            g.angle,
            g.scale_x,
            g.scale_y,
            entity.style.opacity
        )
        .unwrap();

        for (i, shape) in entity.children().iter().enumerate() {
            match shape {
                Shape::Rect(r) => {
                    writeln!(
                        svg,
                        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}" />"#,
                        r.left,
                        r.top,
                        r.width,
                        r.height,
                        escape_xml(&r.fill),
                        escape_xml(&r.stroke)
                    )
                    .unwrap();
                }
                Shape::Text(t) => {
                    // Child 1 is the title row.
                    let class = if i == 1 { "entity-title" } else { "field-text" };
                    writeln!(
                        svg,
                        r#"<text class="{}" x="{}" y="{}" font-size="{}">{}</text>"#,
                        class,
                        t.left,
                        t.top + t.font_size,
                        t.font_size,
                        escape_xml(&t.text)
                    )
                    .unwrap();
                }
                Shape::Line(l) => {
                    writeln!(
                        svg,
                        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" />"#,
                        l.left + l.x1,
                        l.top,
                        l.left + l.x2,
                        l.top,
                        escape_xml(&l.stroke),
                        l.stroke_width
                    )
                    .unwrap();
                }
            }
        }

        writeln!(svg, "</g>").unwrap();
    }

    fn render_relation(&self, svg: &mut String, scene: &Scene, relation: &Relation) {
        let rect_of = |id: &NodeId| scene.get(id).map(Node::bounding_rect);
        let from_rect: Option<Rect> = relation.link_from().and_then(rect_of);
        let to_rect: Option<Rect> = relation.link_to().and_then(rect_of);

        writeln!(
            svg,
            r#"<line id="{}" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" opacity="{}" />"#,
            escape_xml(relation.id().as_str()),
            relation.x1,
            relation.y1,
            relation.x2,
            relation.y2,
            escape_xml(&relation.style.stroke),
            relation.style.stroke_width,
            relation.style.opacity
        )
        .unwrap();

        let heads = relation.arrow_heads(from_rect.as_ref(), to_rect.as_ref(), self.rim_offset);
        for head in &heads {
            self.render_arrow(svg, relation, head);
        }

        if !relation.title.is_empty() {
            let mid_x = (relation.x1 + relation.x2) / 2.0;
            let mid_y = (relation.y1 + relation.y2) / 2.0 - 5.0;
            writeln!(
                svg,
                r#"<text class="relation-label" x="{}" y="{}" text-anchor="middle">{}</text>"#,
                mid_x,
                mid_y,
                escape_xml(&relation.title)
            )
            .unwrap();
        }
    }

    fn render_arrow(&self, svg: &mut String, relation: &Relation, head: &ArrowHead) {
        let points: Vec<String> = head
            .points()
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect();
        writeln!(
            svg,
            r#"<polygon points="{}" fill="{}" />"#,
            points.join(" "),
            escape_xml(&relation.style.fill)
        )
        .unwrap();
    }
}

fn is_visible(node: &Node) -> bool {
    match node {
        Node::Entity(e) => e.style.visible,
        Node::Relation(r) => r.style.visible,
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
