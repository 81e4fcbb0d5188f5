mod stackplot;
mod svg;

pub use crate::stackplot::{Anchor, Arrow, Color, Connector, Figure, FontConfig, Label, Mark, Rect, Rule};
use std::path::Path;

pub fn generate_image(figure: &Figure, path: &Path) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("svg") => {
            let content = svg::generate_string(figure);
            svg::render_from_string(&content, path)
        }
        _ => Err(format!(
            "Unsupported image format for {}: only .svg is supported",
            path.display()
        )),
    }
}
