//! HarfBuzz shaping handle for fontinst
//!
//! The instance does not shape; it owns a HarfBuzz font bound to the same
//! bytes the outline backend reads, and hands it to whoever does. The font
//! is scaled to the face's units-per-em so shaping results come back in
//! font units, the same grid the metric queries start from.

use std::any::Any;
use std::sync::Arc;

use harfbuzz_rs::{Blob, Face, Font as HbFont, Owned};

use fontinst_core::{
    error::BackendError,
    traits::{ShapingBackend, ShapingHandle},
    FontData,
};

/// HarfBuzz shaping backend
#[derive(Debug, Default, Clone, Copy)]
pub struct HarfBuzzBackend;

impl HarfBuzzBackend {
    /// Create a new HarfBuzz backend
    pub fn new() -> Self {
        Self
    }
}

impl ShapingBackend for HarfBuzzBackend {
    fn name(&self) -> &'static str {
        "HarfBuzz"
    }

    fn create_handle(
        &self,
        data: Arc<FontData>,
        face_index: u32,
        units_per_em: u16,
    ) -> Result<Box<dyn ShapingHandle>, BackendError> {
        Ok(Box::new(HbShapingHandle::new(
            data,
            face_index,
            units_per_em,
        )?))
    }
}

/// A HarfBuzz font that keeps its backing data alive
///
/// The blob holds a clone of the instance's data `Arc`, so the bytes stay
/// valid for as long as HarfBuzz can see them. Dropping the handle destroys
/// the font, then the face, then releases the blob.
pub struct HbShapingHandle {
    font: Owned<HbFont<'static>>,
    face_index: u32,
}

impl HbShapingHandle {
    pub fn new(
        data: Arc<FontData>,
        face_index: u32,
        units_per_em: u16,
    ) -> Result<Self, BackendError> {
        let blob = Blob::with_bytes_owned(data, |data| data.as_bytes());
        let face = Face::new(blob, face_index);

        // HarfBuzz hands back an empty face instead of failing
        if face.glyph_count() == 0 {
            return Err(BackendError::new(
                "HarfBuzz",
                format!("face {} has no glyphs", face_index),
            ));
        }

        let mut font = HbFont::new(face);
        let scale = units_per_em as i32;
        font.set_scale(scale, scale);

        log::debug!(
            "Created HarfBuzz font for face {} at scale {}",
            face_index,
            scale
        );

        Ok(Self { font, face_index })
    }

    /// The HarfBuzz font, ready for `harfbuzz_rs::shape`
    pub fn font(&self) -> &HbFont<'static> {
        &self.font
    }

    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    /// HarfBuzz scale, equal to the face's units-per-em on both axes
    pub fn scale(&self) -> (i32, i32) {
        self.font.scale()
    }
}

impl ShapingHandle for HbShapingHandle {
    fn name(&self) -> &'static str {
        "HarfBuzz"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for HbShapingHandle {
    fn drop(&mut self) {
        log::debug!("Releasing HarfBuzz font for face {}", self.face_index);
    }
}
