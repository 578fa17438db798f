pub mod document;
pub mod entity;
pub mod geometry;
pub mod inflect;
pub mod link;
pub mod measure;
pub mod node;
pub mod relation;
pub mod scene;
pub mod schema;
pub mod svg;

use wasm_bindgen::prelude::*;

use document::ResolveMode;
use scene::Scene;
use svg::SvgRenderer;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn load(document: &str, strict: bool) -> Result<Scene, String> {
    let mode = if strict {
        ResolveMode::Strict
    } else {
        ResolveMode::Lenient
    };
    Scene::deserialize(document, mode)
        .map(|resolved| resolved.scene)
        .map_err(|e| e.to_string())
}

/// Derive the schema JSON of a saved diagram document
#[wasm_bindgen(js_name = "deriveSchema")]
pub fn derive_schema(document: &str, strict: Option<bool>) -> Result<String, String> {
    let scene = load(document, strict.unwrap_or(false))?;
    serde_json::to_string(&schema::derive(&scene)).map_err(|e| e.to_string())
}

/// Render a saved diagram document to SVG
#[wasm_bindgen(js_name = "renderDiagramSvg")]
pub fn render_diagram_svg(document: &str) -> Result<String, String> {
    let scene = load(document, false)?;
    Ok(SvgRenderer::default().render(&scene))
}
