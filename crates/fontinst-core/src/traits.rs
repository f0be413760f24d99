//! The seams between a font instance and the libraries that do the work
//!
//! Three roles, each swappable without touching the instance:
//!
//! - [`OutlineBackend`] opens a face and answers metric, mapping, name and
//!   table queries in font units ([`OutlineFace`])
//! - [`ShapingBackend`] builds a shaping handle bound to the same bytes
//!   ([`ShapingHandle`])
//! - [`PlatformResources`] carries whatever a platform variant attaches on
//!   top, released first when the instance is torn down
//!
//! Handles are plain owned values. Dropping a handle releases whatever
//! native resource it wraps, exactly once.

use std::any::Any;
use std::sync::Arc;

use crate::data::FontData;
use crate::error::{BackendError, FontLoadError};
use crate::types::{FaceMetrics, GlyphBBox, GlyphId, Tag, Variant};

/// One open face inside the outline backend
///
/// Every query is a soft lookup: `None` means the face has no answer, and
/// the instance turns that into the documented sentinel. Implementations
/// must not panic on out-of-range glyph ids.
pub trait OutlineFace {
    /// Face-wide metrics in font units
    fn metrics(&self) -> FaceMetrics;

    /// Number of glyphs in the face
    fn num_glyphs(&self) -> u32;

    /// Glyph for a Unicode scalar value, via the face's character map
    fn map_char(&self, codepoint: u32) -> Option<GlyphId>;

    /// Smallest code point the character map covers
    fn first_char_code(&self) -> Option<u32>;

    /// Largest code point the character map covers
    fn last_char_code(&self) -> Option<u32>;

    /// PostScript name of a glyph
    fn glyph_name(&self, glyph_id: GlyphId) -> Option<String>;

    /// Glyph carrying this PostScript name
    fn glyph_by_name(&self, name: &str) -> Option<GlyphId>;

    /// Advance along the horizontal or vertical axis, in font units
    fn advance(&self, glyph_id: GlyphId, vertical: bool) -> Option<f32>;

    /// Control box of the glyph outline, in font units
    fn bounds(&self, glyph_id: GlyphId) -> Option<GlyphBBox>;

    /// Raw bytes of a table, borrowed from the backing data
    fn table(&self, tag: Tag) -> Option<&[u8]>;
}

/// Opens faces from loaded font data
pub trait OutlineBackend {
    /// Who are you? Used in logs and errors
    fn name(&self) -> &'static str;

    /// Instantiates face `face_index` of `data`
    ///
    /// `companion` is an optional second resource the face may consult for
    /// tables the primary data lacks.
    ///
    /// # Errors
    /// [`FontLoadError::FaceIndexOutOfRange`] when the resource has fewer
    /// faces, [`FontLoadError::UnsupportedFormat`] when the bytes are not a
    /// font this backend understands.
    fn open_face(
        &self,
        data: Arc<FontData>,
        companion: Option<Arc<FontData>>,
        face_index: u32,
    ) -> Result<Box<dyn OutlineFace>, FontLoadError>;
}

/// A shaping engine's view of a face
///
/// The instance only owns and exposes this handle; shaping itself happens
/// elsewhere. Downcast through [`as_any`](ShapingHandle::as_any) to reach
/// the engine-specific object.
pub trait ShapingHandle {
    fn name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;
}

/// Creates shaping handles bound to loaded font data
pub trait ShapingBackend {
    fn name(&self) -> &'static str;

    /// Builds a handle for face `face_index` of `data`
    ///
    /// `units_per_em` is the face's design grid, already validated by the
    /// outline backend.
    fn create_handle(
        &self,
        data: Arc<FontData>,
        face_index: u32,
        units_per_em: u16,
    ) -> Result<Box<dyn ShapingHandle>, BackendError>;
}

/// Extra native resources a platform variant attaches to an instance
///
/// Teardown calls [`release`](PlatformResources::release) before any base
/// resource is freed, then drops the value.
pub trait PlatformResources {
    /// Which variant these resources make the instance
    fn variant(&self) -> Variant;

    /// Frees the platform resources
    fn release(&mut self);

    fn as_any(&self) -> &dyn Any;
}

/// Builds the platform resources for one variant
///
/// Runs last during construction, once the base instance's data, face and
/// shaping handle all exist.
pub trait PlatformBackend {
    /// The variant instances built through this backend become
    fn variant(&self) -> Variant;

    fn attach(
        &self,
        data: &Arc<FontData>,
        face_index: u32,
        point_size: f32,
    ) -> Result<Box<dyn PlatformResources>, BackendError>;
}
