//! Typeface fonts (the JSON outline format used by web 3D text) and 3D text meshes.
//!
//! Glyph outlines are stored as a command string: `m x y` moves, `l x y`
//! draws a line, `q x y cx cy` a quadratic curve and `b x y c1x c1y c2x c2y`
//! a cubic curve. Coordinates are in font units; `resolution` units make one
//! em.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::SceneResult;
use crate::geometry::shape::shapes_from_rings;
use crate::geometry::{extrude, ExtrudeOptions, MeshData, Path, Shape};

#[derive(Debug, Clone, Deserialize)]
pub struct Glyph {
    /// Horizontal advance in font units.
    pub ha: f32,
    /// Outline commands; absent for blank glyphs such as space.
    #[serde(default)]
    pub o: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BoundingBox {
    #[serde(rename = "yMin")]
    pub y_min: f32,
    #[serde(rename = "yMax")]
    pub y_max: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Font {
    pub glyphs: HashMap<String, Glyph>,
    #[serde(default = "default_resolution")]
    pub resolution: f32,
    #[serde(rename = "boundingBox")]
    pub bounding_box: BoundingBox,
    #[serde(rename = "underlineThickness", default)]
    pub underline_thickness: f32,
    #[serde(rename = "familyName", default)]
    pub family_name: String,
}

fn default_resolution() -> f32 {
    1000.0
}

#[derive(Debug, Clone, Copy)]
pub struct TextOptions {
    pub size: f32,
    /// Extrusion depth.
    pub height: f32,
    pub curve_segments: u32,
    pub bevel_enabled: bool,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_segments: u32,
}

impl TextOptions {
    fn extrude_options(&self) -> ExtrudeOptions {
        ExtrudeOptions {
            depth: self.height,
            steps: 1,
            bevel_enabled: self.bevel_enabled,
            bevel_thickness: self.bevel_thickness,
            bevel_size: self.bevel_size,
            bevel_segments: self.bevel_segments,
            curve_segments: self.curve_segments,
        }
    }
}

fn parse_outline(
    outline: &str,
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    path: &mut Path,
) {
    let tokens: Vec<&str> = outline.split_whitespace().collect();
    let mut i = 0;
    let coords = |i: &mut usize, n: usize| -> Option<Vec<f32>> {
        let values = tokens
            .get(*i..*i + n)?
            .iter()
            .map(|t| t.parse::<f32>().ok())
            .collect::<Option<Vec<f32>>>()?;
        *i += n;
        Some(values)
    };
    let x = |v: f32| v * scale + offset_x;
    let y = |v: f32| v * scale + offset_y;

    while i < tokens.len() {
        let command = tokens[i];
        i += 1;
        match command {
            "m" => {
                let Some(v) = coords(&mut i, 2) else { break };
                path.move_to(x(v[0]), y(v[1]));
            }
            "l" => {
                let Some(v) = coords(&mut i, 2) else { break };
                path.line_to(x(v[0]), y(v[1]));
            }
            "q" => {
                let Some(v) = coords(&mut i, 4) else { break };
                path.quadratic_curve_to(x(v[2]), y(v[3]), x(v[0]), y(v[1]));
            }
            "b" => {
                let Some(v) = coords(&mut i, 6) else { break };
                path.bezier_curve_to(x(v[2]), y(v[3]), x(v[4]), y(v[5]), x(v[0]), y(v[1]));
            }
            // `z` and anything unknown carry no geometry.
            _ => {}
        }
    }
}

impl Font {
    pub fn from_json(src: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(src)?)
    }

    fn glyph(&self, ch: char) -> Option<&Glyph> {
        let mut buf = [0u8; 4];
        self.glyphs.get(ch.encode_utf8(&mut buf) as &str)
    }

    pub fn has_glyph(&self, ch: char) -> bool {
        self.glyph(ch).is_some()
    }

    /// Lays `text` out at `size` and returns the filled shapes, baseline at y = 0.
    pub fn generate_shapes(&self, text: &str, size: f32, curve_segments: u32) -> Vec<Shape> {
        let scale = size / self.resolution;
        let line_height =
            (self.bounding_box.y_max - self.bounding_box.y_min + self.underline_thickness) * scale;

        let mut rings = Vec::new();
        let mut offset_x = 0.0;
        let mut offset_y = 0.0;
        for ch in text.chars() {
            if ch == '\n' {
                offset_x = 0.0;
                offset_y -= line_height;
                continue;
            }
            let glyph = match self.glyph(ch).or_else(|| self.glyph('?')) {
                Some(glyph) => glyph,
                None => {
                    log::warn!("font {:?} has no glyph for {ch:?} and no fallback", self.family_name);
                    continue;
                }
            };
            if !self.has_glyph(ch) {
                log::warn!("font {:?} has no glyph for {ch:?}, using '?'", self.family_name);
            }
            if let Some(outline) = &glyph.o {
                let mut path = Path::new();
                parse_outline(outline, scale, offset_x, offset_y, &mut path);
                rings.extend(path.extract_points(curve_segments));
            }
            offset_x += glyph.ha * scale;
        }
        shapes_from_rings(rings)
    }
}

/// Extruded, centred text mesh. Empty when no glyph produced geometry.
pub fn text_mesh(font: &Font, text: &str, options: &TextOptions) -> MeshData {
    let shapes = font.generate_shapes(text, options.size, options.curve_segments);
    let mut mesh = extrude(&shapes, &options.extrude_options());
    mesh.center();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) const BLOCKY_FONT: &str = r#"{
        "familyName": "Blocky",
        "resolution": 1000,
        "boundingBox": { "yMin": -200, "yMax": 800, "xMin": 0, "xMax": 800 },
        "underlineThickness": 50,
        "glyphs": {
            "o": { "ha": 900, "o": "m 0 0 l 800 0 l 800 800 l 0 800 z m 200 200 l 200 600 l 600 600 l 600 200 z" },
            "?": { "ha": 500, "o": "m 0 0 l 400 0 q 400 400 200 400 l 0 0 z" },
            " ": { "ha": 300 }
        }
    }"#;

    #[test]
    fn parses_typeface_json() {
        let font = Font::from_json(BLOCKY_FONT).unwrap();
        assert_eq!(font.glyphs.len(), 3);
        assert_eq!(font.resolution, 1000.0);
        assert_eq!(font.family_name, "Blocky");
    }

    #[test]
    fn counters_become_holes() {
        let font = Font::from_json(BLOCKY_FONT).unwrap();
        let shapes = font.generate_shapes("o", 1.0, 4);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].holes.len(), 1);
    }

    #[test]
    fn advance_moves_next_glyph() {
        let font = Font::from_json(BLOCKY_FONT).unwrap();
        let shapes = font.generate_shapes("o o", 1.0, 4);
        assert_eq!(shapes.len(), 2);
        let second_min_x = shapes[1]
            .outline
            .iter()
            .map(|p| p.x)
            .fold(f32::MAX, f32::min);
        assert!((second_min_x - 1.2).abs() < 1e-5);
    }

    #[test]
    fn missing_glyph_falls_back_to_question_mark() {
        let font = Font::from_json(BLOCKY_FONT).unwrap();
        let shapes = font.generate_shapes("•", 1.0, 4);
        assert_eq!(shapes.len(), 1);
    }

    #[test]
    fn text_mesh_is_centred() {
        let font = Font::from_json(BLOCKY_FONT).unwrap();
        let options = TextOptions {
            size: 0.55,
            height: 0.12,
            curve_segments: 10,
            bevel_enabled: true,
            bevel_thickness: 0.025,
            bevel_size: 0.02,
            bevel_segments: 5,
        };
        let mesh = text_mesh(&font, "oo", &options);
        let (lo, hi) = mesh.bounding_box().unwrap();
        assert!((lo + hi).length() < 1e-4);
        assert!(!mesh.is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Font::from_json("{\"glyphs\": 3}").is_err());
    }
}
