//! Synthesized stand-in tiles for slots with no backing file.

use std::fmt;

use ab_glyph::{point, Font, FontArc, FontVec, Glyph, GlyphId, PxScale, ScaleFont};
use fontdb::{Database, Family, Query, Weight};
use image::{Rgba, RgbaImage};
use tracing::{debug, warn};

use crate::events::SlotId;

const TILE_BACKGROUND: Rgba<u8> = Rgba([0x44, 0x44, 0x44, 0xFF]);
const LABEL_COLOR: [u8; 3] = [0xFF, 0xFF, 0xFF];
const LABEL_HEIGHT_FRACTION: f32 = 0.1;

/// Paints deterministic placeholder tiles: a dark neutral background with
/// the slot id centered in large bold digits. Identical ids always produce
/// identical tiles.
#[derive(Clone)]
pub struct PlaceholderPainter {
    width: u32,
    height: u32,
    font: Option<FontArc>,
}

impl PlaceholderPainter {
    /// Resolves a bold label font once, up front. On systems without any
    /// usable font the tiles are painted without the id label.
    #[must_use]
    pub fn new(width: u32, height: u32, preferred_family: Option<&str>) -> Self {
        let font = load_label_font(preferred_family);
        if font.is_none() {
            warn!("no usable label font found; placeholder tiles will carry no id text");
        }
        Self {
            width,
            height,
            font,
        }
    }

    #[must_use]
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Paint the tile for `id` at the configured dimensions.
    #[must_use]
    pub fn synthesize(&self, id: SlotId) -> RgbaImage {
        let mut tile = RgbaImage::from_pixel(self.width, self.height, TILE_BACKGROUND);
        if let Some(font) = &self.font {
            draw_centered_label(&mut tile, font, &id.to_string());
        }
        debug!(
            id,
            width = self.width,
            height = self.height,
            "synthesized placeholder tile"
        );
        tile
    }
}

impl fmt::Debug for PlaceholderPainter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaceholderPainter")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

fn load_label_font(preferred: Option<&str>) -> Option<FontArc> {
    let mut db = Database::new();
    db.load_system_fonts();

    if let Some(name) = preferred {
        if let Some(font) = load_named_font(&db, name) {
            return Some(font);
        }
        warn!(requested = name, "preferred label font not found; falling back");
    }

    let query = Query {
        families: &[Family::SansSerif, Family::Serif, Family::Monospace],
        weight: Weight::BOLD,
        ..Query::default()
    };
    let face_id = db.query(&query).or_else(|| db.faces().next().map(|f| f.id))?;
    db.with_face_data(face_id, |data, index| {
        FontVec::try_from_vec_and_index(data.to_vec(), index)
            .ok()
            .map(FontArc::new)
    })?
}

fn load_named_font(db: &Database, name: &str) -> Option<FontArc> {
    let requested_lower = name.to_lowercase();
    let face_id = db.faces().find_map(|face| {
        let mut matches_family = face
            .families
            .iter()
            .any(|(family, _)| family.to_lowercase() == requested_lower);
        if !matches_family {
            matches_family = face.post_script_name.to_lowercase() == requested_lower;
        }
        matches_family.then_some(face.id)
    })?;
    db.with_face_data(face_id, |data, index| {
        FontVec::try_from_vec_and_index(data.to_vec(), index)
            .ok()
            .map(FontArc::new)
    })?
}

fn draw_centered_label(tile: &mut RgbaImage, font: &FontArc, text: &str) {
    let px = (tile.height() as f32 * LABEL_HEIGHT_FRACTION).max(8.0);
    let scaled = font.as_scaled(PxScale::from(px));

    // Lay the glyphs out on a caret, kerning included.
    let mut glyphs: Vec<Glyph> = Vec::with_capacity(text.len());
    let mut caret = 0.0_f32;
    let mut previous: Option<GlyphId> = None;
    for ch in text.chars() {
        let mut glyph = scaled.scaled_glyph(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, glyph.id);
        }
        glyph.position = point(caret, 0.0);
        caret += scaled.h_advance(glyph.id);
        previous = Some(glyph.id);
        glyphs.push(glyph);
    }

    let text_w = caret;
    let ascent = scaled.ascent();
    let text_h = ascent - scaled.descent();
    let origin_x = (tile.width() as f32 - text_w) / 2.0;
    let baseline_y = (tile.height() as f32 - text_h) / 2.0 + ascent;

    let (tile_w, tile_h) = tile.dimensions();
    for mut glyph in glyphs {
        glyph.position = point(glyph.position.x + origin_x, baseline_y);
        let Some(outline) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outline.px_bounds();
        outline.draw(|gx, gy, coverage| {
            let x = bounds.min.x + gx as f32;
            let y = bounds.min.y + gy as f32;
            if x < 0.0 || y < 0.0 || x >= tile_w as f32 || y >= tile_h as f32 {
                return;
            }
            let pixel = tile.get_pixel_mut(x as u32, y as u32);
            for (channel, target) in pixel.0.iter_mut().take(3).zip(LABEL_COLOR) {
                let blended =
                    f32::from(*channel) + (f32::from(target) - f32::from(*channel)) * coverage;
                *channel = blended.round().clamp(0.0, 255.0) as u8;
            }
        });
    }
}
