// this_file: backends/fontinst-outline-skrifa/src/cbox.rs

//! Control-box computation from glyph outlines.
//!
//! Used when the font carries no precomputed glyph bounds (CFF and CFF2
//! outlines). Every point the outline visits, on-curve or control, widens
//! the box, which matches what a rasterizer's control box reports.

use fontinst_core::types::GlyphBBox;
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{FontRef, GlyphId, MetadataProvider};

/// Pen that only tracks the extent of the points it is given
#[derive(Debug, Default)]
pub(crate) struct ControlBoxPen {
    bbox: Option<GlyphBBox>,
}

impl ControlBoxPen {
    fn add(&mut self, x: f32, y: f32) {
        let bbox = self.bbox.get_or_insert(GlyphBBox::new(x, y, x, y));
        bbox.x_min = bbox.x_min.min(x);
        bbox.y_min = bbox.y_min.min(y);
        bbox.x_max = bbox.x_max.max(x);
        bbox.y_max = bbox.y_max.max(y);
    }

    /// The accumulated box, `None` if the outline had no points
    pub(crate) fn finish(self) -> Option<GlyphBBox> {
        self.bbox
    }
}

impl OutlinePen for ControlBoxPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.add(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.add(x, y);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.add(cx0, cy0);
        self.add(x, y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.add(cx0, cy0);
        self.add(cx1, cy1);
        self.add(x, y);
    }

    fn close(&mut self) {}
}

/// Draws the glyph unscaled and returns its control box in font units
pub(crate) fn outline_control_box(font: &FontRef<'_>, glyph_id: GlyphId) -> Option<GlyphBBox> {
    let outlines = font.outline_glyphs();
    let glyph = outlines.get(glyph_id)?;
    let settings = DrawSettings::unhinted(Size::unscaled(), LocationRef::default());
    let mut pen = ControlBoxPen::default();
    glyph.draw(settings, &mut pen).ok()?;
    pen.finish()
}
