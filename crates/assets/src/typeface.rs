use glam::Vec2;
use serde::Deserialize;
use std::collections::HashMap;

use crate::AssetError;

/// Glyph used when a character has no entry of its own.
const FALLBACK_GLYPH: char = '?';

/// Font bounding box in font units.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TypefaceBounds {
    #[serde(rename = "xMin")]
    pub x_min: f32,
    #[serde(rename = "xMax")]
    pub x_max: f32,
    #[serde(rename = "yMin")]
    pub y_min: f32,
    #[serde(rename = "yMax")]
    pub y_max: f32,
}

#[derive(Debug, Clone, Deserialize)]
struct GlyphData {
    /// Horizontal advance in font units.
    ha: f32,
    /// Outline command string, absent for blank glyphs such as space.
    #[serde(default)]
    o: Option<String>,
}

/// A parsed typeface JSON font.
///
/// Glyph outlines stay as command strings until a layout asks for them, so
/// loading a font does not pay for glyphs the text never uses.
#[derive(Debug, Clone, Deserialize)]
pub struct Typeface {
    #[serde(rename = "familyName", default)]
    family_name: String,
    resolution: f32,
    #[serde(rename = "boundingBox")]
    bounds: TypefaceBounds,
    #[serde(rename = "underlineThickness", default)]
    underline_thickness: f32,
    glyphs: HashMap<String, GlyphData>,
}

/// One drawing command of a glyph outline, already scaled and offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo { ctrl: Vec2, to: Vec2 },
    CubicTo { ctrl1: Vec2, ctrl2: Vec2, to: Vec2 },
}

/// Outline of a single laid-out character.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphOutline {
    pub glyph: char,
    pub commands: Vec<PathCommand>,
}

impl Typeface {
    /// Parse a typeface JSON document.
    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        let font: Self = serde_json::from_str(json)?;
        if !(font.resolution.is_finite() && font.resolution > 0.0) {
            return Err(AssetError::InvalidFont(format!(
                "resolution must be positive, got {}",
                font.resolution
            )));
        }
        Ok(font)
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    pub fn bounds(&self) -> TypefaceBounds {
        self.bounds
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn has_glyph(&self, c: char) -> bool {
        let mut buf = [0; 4];
        let key: &str = c.encode_utf8(&mut buf);
        self.glyphs.contains_key(key)
    }

    /// Distance between baselines for text of the given size.
    pub fn line_height(&self, size: f32) -> f32 {
        let scale = size / self.resolution;
        (self.bounds.y_max - self.bounds.y_min + self.underline_thickness) * scale
    }

    /// Lay out `text` at `size` world units per em and return one outline per
    /// drawable character. `\n` starts a new line below the previous one.
    pub fn layout(&self, text: &str, size: f32) -> Result<Vec<GlyphOutline>, AssetError> {
        let scale = size / self.resolution;
        let line_height = self.line_height(size);
        let mut offset = Vec2::ZERO;
        let mut outlines = Vec::new();

        for c in text.chars() {
            if c == '\n' {
                offset.x = 0.0;
                offset.y -= line_height;
                continue;
            }

            let Some(glyph) = self.lookup(c) else {
                tracing::warn!("character {c:?} missing from font {:?}", self.family_name);
                continue;
            };

            if let Some(outline) = glyph.o.as_deref() {
                let commands = parse_outline(c, outline, scale, offset)?;
                if !commands.is_empty() {
                    outlines.push(GlyphOutline { glyph: c, commands });
                }
            }
            offset.x += glyph.ha * scale;
        }

        Ok(outlines)
    }

    fn lookup(&self, c: char) -> Option<&GlyphData> {
        let mut buf = [0; 4];
        let key: &str = c.encode_utf8(&mut buf);
        if let Some(glyph) = self.glyphs.get(key) {
            return Some(glyph);
        }
        let mut buf = [0; 4];
        let fallback: &str = FALLBACK_GLYPH.encode_utf8(&mut buf);
        self.glyphs.get(fallback)
    }
}

/// Parse an outline string. Tokens are `m x y`, `l x y`, `q x y cx cy` and
/// `b x y c1x c1y c2x c2y`; curve end points come before their controls.
fn parse_outline(
    glyph: char,
    outline: &str,
    scale: f32,
    offset: Vec2,
) -> Result<Vec<PathCommand>, AssetError> {
    let mut tokens = outline.split_whitespace();
    let mut commands = Vec::new();

    let point = |tokens: &mut std::str::SplitWhitespace<'_>| -> Result<Vec2, AssetError> {
        let x = next_number(glyph, tokens)?;
        let y = next_number(glyph, tokens)?;
        Ok(Vec2::new(x, y) * scale + offset)
    };

    while let Some(action) = tokens.next() {
        match action {
            "m" => commands.push(PathCommand::MoveTo(point(&mut tokens)?)),
            "l" => commands.push(PathCommand::LineTo(point(&mut tokens)?)),
            "q" => {
                let to = point(&mut tokens)?;
                let ctrl = point(&mut tokens)?;
                commands.push(PathCommand::QuadTo { ctrl, to });
            }
            "b" => {
                let to = point(&mut tokens)?;
                let ctrl1 = point(&mut tokens)?;
                let ctrl2 = point(&mut tokens)?;
                commands.push(PathCommand::CubicTo { ctrl1, ctrl2, to });
            }
            other => tracing::trace!("ignoring outline token {other:?} in glyph {glyph:?}"),
        }
    }

    Ok(commands)
}

fn next_number(glyph: char, tokens: &mut std::str::SplitWhitespace<'_>) -> Result<f32, AssetError> {
    let token = tokens.next().ok_or_else(|| AssetError::InvalidGlyph {
        glyph,
        reason: "outline ended in the middle of a command".into(),
    })?;
    token.parse().map_err(|_| AssetError::InvalidGlyph {
        glyph,
        reason: format!("expected a number, found {token:?}"),
    })
}
