//! Outline and metrics backend for fontinst, built on read-fonts and skrifa
//!
//! Opens sfnt fonts and collections (TTF, OTF, TTC, OTC) and answers every
//! face query the instance asks: vertical metrics, character map lookups,
//! glyph names, advances, bounds and raw tables.
//!
//! ## Memory
//!
//! The face keeps the backing data alive through an `Arc` and builds a
//! `FontRef` on demand for each query. Nothing borrows across calls, so no
//! `'static` tricks are needed to tie parsed views to the buffer.

use std::sync::Arc;

use read_fonts::types::Tag as ReadTag;
use read_fonts::{FileRef, FontRef, TableProvider};
use skrifa::instance::{LocationRef, Size};
use skrifa::{GlyphId, GlyphNameSource, GlyphNames, MetadataProvider};

use fontinst_core::{
    error::FontLoadError,
    traits::{OutlineBackend, OutlineFace},
    types::{FaceMetrics, GlyphBBox, GlyphId as FiGlyphId, Tag, NOTDEF_GLYPH},
    FontData,
};

mod cbox;

/// The read-fonts/skrifa outline backend
#[derive(Debug, Default, Clone, Copy)]
pub struct SkrifaBackend;

impl SkrifaBackend {
    pub fn new() -> Self {
        Self
    }

    /// Number of faces in `data`: 1 for a plain font, N for a collection
    pub fn face_count(data: &[u8]) -> Result<u32, FontLoadError> {
        match FileRef::new(data) {
            Ok(FileRef::Font(_)) => Ok(1),
            Ok(FileRef::Collection(collection)) => Ok(collection.len()),
            Err(e) => Err(FontLoadError::UnsupportedFormat(e.to_string())),
        }
    }
}

impl OutlineBackend for SkrifaBackend {
    fn name(&self) -> &'static str {
        "skrifa"
    }

    fn open_face(
        &self,
        data: Arc<FontData>,
        companion: Option<Arc<FontData>>,
        face_index: u32,
    ) -> Result<Box<dyn OutlineFace>, FontLoadError> {
        Ok(Box::new(SkrifaFace::open(data, companion, face_index)?))
    }
}

/// One face of a font file, parsed lazily per query
pub struct SkrifaFace {
    data: Arc<FontData>,
    companion: Option<Arc<FontData>>,
    face_index: u32,
    num_glyphs: u32,
    metrics: FaceMetrics,
}

impl SkrifaFace {
    /// Validates face `face_index` of `data` and reads its metrics
    pub fn open(
        data: Arc<FontData>,
        companion: Option<Arc<FontData>>,
        face_index: u32,
    ) -> Result<Self, FontLoadError> {
        let count = SkrifaBackend::face_count(data.as_bytes())?;
        if face_index >= count {
            return Err(FontLoadError::FaceIndexOutOfRange {
                index: face_index,
                count,
            });
        }

        let font = FontRef::from_index(data.as_bytes(), face_index)
            .map_err(|e| FontLoadError::UnsupportedFormat(e.to_string()))?;

        // skrifa substitutes a default upem when head is missing; an
        // instance must not be built on a guess
        let head = font
            .head()
            .map_err(|e| FontLoadError::UnsupportedFormat(format!("no usable head table: {e}")))?;
        if head.units_per_em() == 0 {
            return Err(FontLoadError::InvalidMetrics("units per em is zero".to_string()));
        }

        let num_glyphs = font
            .maxp()
            .map(|maxp| maxp.num_glyphs() as u32)
            .unwrap_or(0);

        let m = font.metrics(Size::unscaled(), LocationRef::default());
        if m.cap_height.is_none() || m.x_height.is_none() {
            log::debug!("Face {} has no OS/2 cap or x height", face_index);
        }
        let metrics = FaceMetrics {
            units_per_em: head.units_per_em(),
            ascent: m.ascent,
            descent: m.descent,
            cap_height: m.cap_height,
            x_height: m.x_height,
            italic_angle: m.italic_angle,
        };

        let companion = companion.filter(|extra| match FontRef::new(extra.as_bytes()) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Ignoring companion resource that is not a font: {}", e);
                false
            }
        });

        log::debug!(
            "Opened face {} of {}: {} glyphs, upem {}",
            face_index,
            count,
            num_glyphs,
            metrics.units_per_em
        );

        Ok(Self {
            data,
            companion,
            face_index,
            num_glyphs,
            metrics,
        })
    }

    /// Creates a FontRef on-demand for parsing operations
    fn font_ref(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(self.data.as_bytes(), self.face_index).ok()
    }

    fn companion_ref(&self) -> Option<FontRef<'_>> {
        self.companion
            .as_ref()
            .and_then(|extra| FontRef::new(extra.as_bytes()).ok())
    }

    fn in_range(&self, glyph_id: FiGlyphId) -> bool {
        glyph_id < self.num_glyphs
    }

    /// Vertical advance from vmtx, or the line height when there is none
    fn vertical_advance(&self, font: &FontRef<'_>, glyph_id: FiGlyphId) -> Option<f32> {
        if let Some(advance) = font
            .vmtx()
            .ok()
            .and_then(|vmtx| vmtx.advance(GlyphId::new(glyph_id)))
        {
            return Some(advance as f32);
        }
        Some(self.metrics.ascent - self.metrics.descent)
    }
}

/// Glyph names stored in the font, from `post` or else the CFF charset
///
/// `None` when the font stores neither; skrifa's synthesized `gidN` names
/// are not names the font carries.
fn stored_glyph_names<'a>(font: &FontRef<'a>) -> Option<GlyphNames<'a>> {
    let names = font.glyph_names();
    match names.source() {
        GlyphNameSource::Synthesized => None,
        GlyphNameSource::Post | GlyphNameSource::Cff => Some(names),
    }
}

impl OutlineFace for SkrifaFace {
    fn metrics(&self) -> FaceMetrics {
        self.metrics
    }

    fn num_glyphs(&self) -> u32 {
        self.num_glyphs
    }

    fn map_char(&self, codepoint: u32) -> Option<FiGlyphId> {
        let font = self.font_ref()?;
        font.charmap()
            .map(codepoint)
            .map(|gid| gid.to_u32())
            .filter(|&gid| gid != NOTDEF_GLYPH)
    }

    fn first_char_code(&self) -> Option<u32> {
        let font = self.font_ref()?;
        let charmap = font.charmap();
        charmap
            .mappings()
            .filter(|(_, gid)| gid.to_u32() != NOTDEF_GLYPH)
            .map(|(cp, _)| cp)
            .min()
    }

    fn last_char_code(&self) -> Option<u32> {
        let font = self.font_ref()?;
        let charmap = font.charmap();
        charmap
            .mappings()
            .filter(|(_, gid)| gid.to_u32() != NOTDEF_GLYPH)
            .map(|(cp, _)| cp)
            .max()
    }

    fn glyph_name(&self, glyph_id: FiGlyphId) -> Option<String> {
        if !self.in_range(glyph_id) {
            return None;
        }
        let font = self.font_ref()?;
        let names = stored_glyph_names(&font)?;
        names
            .get(GlyphId::new(glyph_id))
            .filter(|name| !name.is_synthesized())
            .map(|name| name.as_str().to_owned())
    }

    fn glyph_by_name(&self, name: &str) -> Option<FiGlyphId> {
        if name.is_empty() {
            return None;
        }
        let font = self.font_ref()?;
        let names = stored_glyph_names(&font)?;
        names
            .iter()
            .find(|(_, candidate)| !candidate.is_synthesized() && candidate.as_str() == name)
            .map(|(gid, _)| gid.to_u32())
            .filter(|&gid| self.in_range(gid))
    }

    fn advance(&self, glyph_id: FiGlyphId, vertical: bool) -> Option<f32> {
        if !self.in_range(glyph_id) {
            return None;
        }
        let font = self.font_ref()?;
        if vertical {
            return self.vertical_advance(&font, glyph_id);
        }
        font.glyph_metrics(Size::unscaled(), LocationRef::default())
            .advance_width(GlyphId::new(glyph_id))
    }

    fn bounds(&self, glyph_id: FiGlyphId) -> Option<GlyphBBox> {
        if !self.in_range(glyph_id) {
            return None;
        }
        let font = self.font_ref()?;
        let gid = GlyphId::new(glyph_id);
        let from_metrics = font
            .glyph_metrics(Size::unscaled(), LocationRef::default())
            .bounds(gid)
            .map(|b| GlyphBBox::new(b.x_min, b.y_min, b.x_max, b.y_max));
        from_metrics.or_else(|| cbox::outline_control_box(&font, gid))
    }

    fn table(&self, tag: Tag) -> Option<&[u8]> {
        let tag = ReadTag::new(&tag.to_bytes());
        if let Some(data) = self.font_ref().and_then(|font| font.table_data(tag)) {
            return Some(data.as_bytes());
        }
        self.companion_ref()
            .and_then(|font| font.table_data(tag))
            .map(|data| data.as_bytes())
    }
}
