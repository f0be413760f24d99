// this_file: crates/fontinst/src/instance.rs

//! The font instance: one face, one size, every query a layout engine asks.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fontinst_core::{
    error::{FontLoadError, Result},
    types::{GlyphBBox, GlyphId, SfntTable, Tag, Variant, NOTDEF_GLYPH, NO_CHAR_CODE},
    FontData, OutlineFace, PlatformResources, ShapingHandle,
};

use crate::options::OpenOptions;

/// One loaded face at one point size
///
/// Built by [`FontInstance::open`] or [`OpenOptions::open`]. After
/// construction only the layout direction can change; everything else is
/// cached at init and read back in constant time.
///
/// ## Conventions
///
/// All lengths are in points. `descent` is negative below the baseline,
/// the sign the outline backend reports. [`glyph_height_depth`] returns
/// depth as a positive distance below the baseline.
///
/// ## Teardown
///
/// Dropping the instance (or calling [`destroy`]) runs one teardown path:
/// platform resources are released first, then the shaping handle, the
/// outline face, the backing buffers and the filename, in that order.
///
/// [`glyph_height_depth`]: FontInstance::glyph_height_depth
/// [`destroy`]: FontInstance::destroy
pub struct FontInstance {
    units_per_em: u16,
    point_size: f32,
    ascent: f32,
    descent: f32,
    cap_height: f32,
    x_height: f32,
    italic_angle: f32,
    vertical: bool,
    face_index: u32,
    num_glyphs: u32,

    // Field order below is teardown order. Platform resources are taken
    // and released in `Drop::drop`, before any of these are dropped.
    platform: Option<Box<dyn PlatformResources>>,
    shaper: Box<dyn ShapingHandle>,
    face: Box<dyn OutlineFace>,
    backing: Arc<FontData>,
    backing2: Option<Arc<FontData>>,
    filename: PathBuf,
}

impl FontInstance {
    /// Opens face `face_index` of `path` at `point_size` with the default
    /// backends
    ///
    /// # Errors
    /// Returns a [`FontLoadError`] (wrapped in
    /// [`FontInstError`](fontinst_core::FontInstError)) when the file is
    /// missing or unreadable, the face index is out of range, the format
    /// is not recognized, or memory for the font could not be obtained.
    pub fn open(path: impl AsRef<Path>, face_index: u32, point_size: f32) -> Result<Self> {
        OpenOptions::new().open(path, face_index, point_size)
    }

    pub(crate) fn initialize(
        options: &OpenOptions<'_>,
        path: &Path,
        face_index: u32,
        point_size: f32,
    ) -> Result<Self> {
        if !(point_size.is_finite() && point_size > 0.0) {
            return Err(FontLoadError::InvalidPointSize(point_size).into());
        }

        let backing = Arc::new(FontData::load(path, &options.config)?);

        let backing2 = options.companion.as_deref().and_then(|companion| {
            match FontData::load(companion, &options.config) {
                Ok(data) => Some(Arc::new(data)),
                Err(e) => {
                    log::warn!("Skipping companion resource: {}", e);
                    None
                }
            }
        });

        let face = options
            .outline
            .open_face(Arc::clone(&backing), backing2.clone(), face_index)?;

        let metrics = face.metrics();
        if metrics.units_per_em == 0 {
            return Err(FontLoadError::InvalidMetrics(format!(
                "{} reported zero units per em for {}",
                options.outline.name(),
                path.display()
            ))
            .into());
        }

        let shaper = options
            .shaping
            .create_handle(Arc::clone(&backing), face_index, metrics.units_per_em)
            .map_err(FontLoadError::from)?;

        let upem = metrics.units_per_em as f32;
        let to_points = |units: f32| units * point_size / upem;

        let cap_height = metrics.cap_height.unwrap_or_else(|| {
            log::debug!("No cap height in {}, using ascent", path.display());
            metrics.ascent
        });
        let x_height = metrics.x_height.unwrap_or(metrics.ascent / 2.0);

        let platform = match options.platform {
            Some(platform) => Some(platform.attach(&backing, face_index, point_size)?),
            None => None,
        };

        let instance = FontInstance {
            units_per_em: metrics.units_per_em,
            point_size,
            ascent: to_points(metrics.ascent),
            descent: to_points(metrics.descent),
            cap_height: to_points(cap_height),
            x_height: to_points(x_height),
            italic_angle: metrics.italic_angle,
            vertical: false,
            face_index,
            num_glyphs: face.num_glyphs(),
            platform,
            shaper,
            face,
            backing,
            backing2,
            filename: path.to_path_buf(),
        };

        log::debug!(
            "Opened {} face {} at {}pt ({} variant, {} + {})",
            instance.filename.display(),
            face_index,
            point_size,
            instance.variant().name(),
            options.outline.name(),
            instance.shaper.name()
        );

        Ok(instance)
    }

    /// Tears the instance down
    ///
    /// Same as dropping it; the explicit call reads better at the end of a
    /// layout engine's font lifetime.
    pub fn destroy(self) {
        drop(self);
    }

    /// Switches the primary axis for advance queries
    ///
    /// No backend is re-queried. Ascent and descent keep their horizontal
    /// values; [`glyph_width`](Self::glyph_width) and the queries built on
    /// it switch to vertical advances.
    pub fn set_layout_dir_vertical(&mut self, vertical: bool) {
        self.vertical = vertical;
    }

    pub fn layout_dir_vertical(&self) -> bool {
        self.vertical
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    /// Negative below the baseline
    pub fn descent(&self) -> f32 {
        self.descent
    }

    pub fn cap_height(&self) -> f32 {
        self.cap_height
    }

    pub fn x_height(&self) -> f32 {
        self.x_height
    }

    /// Degrees; 0 for upright fonts
    pub fn italic_angle(&self) -> f32 {
        self.italic_angle
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    pub fn num_glyphs(&self) -> u32 {
        self.num_glyphs
    }

    /// The file this instance was loaded from and its face index
    pub fn filename(&self) -> (&Path, u32) {
        (&self.filename, self.face_index)
    }

    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    pub fn variant(&self) -> Variant {
        self.platform
            .as_ref()
            .map_or(Variant::Portable, |platform| platform.variant())
    }

    /// The shaping handle bound to this face
    ///
    /// Downcast with `as_any()` to reach the engine object, e.g.
    /// `fontinst_shape_hb::HbShapingHandle`.
    pub fn shaping_handle(&self) -> &dyn ShapingHandle {
        self.shaper.as_ref()
    }

    pub fn platform_resources(&self) -> Option<&dyn PlatformResources> {
        self.platform.as_deref()
    }

    /// The primary backing buffer
    pub fn backing_data(&self) -> &Arc<FontData> {
        &self.backing
    }

    /// The companion buffer, if one was loaded
    pub fn companion_data(&self) -> Option<&Arc<FontData>> {
        self.backing2.as_ref()
    }

    pub fn units_to_points(&self, units: f32) -> f32 {
        (units * self.point_size) / self.units_per_em as f32
    }

    pub fn points_to_units(&self, points: f32) -> f32 {
        (points * self.units_per_em as f32) / self.point_size
    }

    /// Glyph for a Unicode scalar value, [`NOTDEF_GLYPH`] when unmapped
    pub fn map_char_to_glyph(&self, codepoint: u32) -> GlyphId {
        self.face.map_char(codepoint).unwrap_or(NOTDEF_GLYPH)
    }

    /// Glyph carrying a PostScript name, [`NOTDEF_GLYPH`] when unknown
    pub fn map_glyph_to_index(&self, glyph_name: &str) -> GlyphId {
        self.face.glyph_by_name(glyph_name).unwrap_or(NOTDEF_GLYPH)
    }

    /// PostScript name of a glyph
    ///
    /// `None` when the font has no usable name table or no name for this
    /// glyph. The name's length is its `len()`.
    pub fn glyph_name(&self, glyph_id: GlyphId) -> Option<String> {
        if !self.has_glyph(glyph_id) {
            return None;
        }
        self.face.glyph_name(glyph_id)
    }

    /// Smallest mapped code point, [`NO_CHAR_CODE`] for an empty cmap
    pub fn first_char_code(&self) -> u32 {
        self.face.first_char_code().unwrap_or(NO_CHAR_CODE)
    }

    /// Largest mapped code point, [`NO_CHAR_CODE`] for an empty cmap
    pub fn last_char_code(&self) -> u32 {
        self.face.last_char_code().unwrap_or(NO_CHAR_CODE)
    }

    /// Advance along the current layout direction
    ///
    /// 0 for glyph ids outside the face.
    pub fn glyph_width(&self, glyph_id: GlyphId) -> f32 {
        if !self.has_glyph(glyph_id) {
            return 0.0;
        }
        self.face
            .advance(glyph_id, self.vertical)
            .map_or(0.0, |units| self.units_to_points(units))
    }

    /// Control box of the glyph outline
    ///
    /// [`GlyphBBox::ZERO`] for glyph ids outside the face and for glyphs
    /// with no outline.
    pub fn glyph_bounds(&self, glyph_id: GlyphId) -> GlyphBBox {
        if !self.has_glyph(glyph_id) {
            return GlyphBBox::ZERO;
        }
        let scale = self.point_size / self.units_per_em as f32;
        self.face
            .bounds(glyph_id)
            .map_or(GlyphBBox::ZERO, |bbox| bbox.scaled(scale))
    }

    /// Height above and depth below the baseline, both positive for a
    /// glyph that crosses it
    pub fn glyph_height_depth(&self, glyph_id: GlyphId) -> (f32, f32) {
        let bbox = self.glyph_bounds(glyph_id);
        (bbox.y_max, -bbox.y_min)
    }

    /// Left and right side bearings
    pub fn glyph_sidebearings(&self, glyph_id: GlyphId) -> (f32, f32) {
        let width = self.glyph_width(glyph_id);
        let bbox = self.glyph_bounds(glyph_id);
        (bbox.x_min, width - bbox.x_max)
    }

    /// How far a slanted glyph's ink overhangs its advance
    ///
    /// Always 0 for upright fonts.
    pub fn glyph_ital_corr(&self, glyph_id: GlyphId) -> f32 {
        if self.italic_angle == 0.0 {
            return 0.0;
        }
        let width = self.glyph_width(glyph_id);
        let bbox = self.glyph_bounds(glyph_id);
        if bbox.x_max > width {
            bbox.x_max - width
        } else {
            0.0
        }
    }

    /// Raw bytes of the table stored under `tag`, borrowed from the
    /// instance
    pub fn font_table(&self, tag: Tag) -> Option<&[u8]> {
        self.face.table(tag)
    }

    /// [`font_table`](Self::font_table) keyed by the backend-native table
    /// enumeration
    pub fn font_table_sfnt(&self, table: SfntTable) -> Option<&[u8]> {
        self.face.table(table.tag())
    }

    fn has_glyph(&self, glyph_id: GlyphId) -> bool {
        glyph_id < self.num_glyphs
    }
}

impl Drop for FontInstance {
    fn drop(&mut self) {
        if let Some(mut platform) = self.platform.take() {
            log::debug!(
                "Releasing {} resources for {}",
                platform.variant().name(),
                self.filename.display()
            );
            platform.release();
        }
        log::debug!(
            "Releasing font instance {} face {}",
            self.filename.display(),
            self.face_index
        );
    }
}

impl fmt::Debug for FontInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontInstance")
            .field("filename", &self.filename)
            .field("face_index", &self.face_index)
            .field("point_size", &self.point_size)
            .field("units_per_em", &self.units_per_em)
            .field("ascent", &self.ascent)
            .field("descent", &self.descent)
            .field("vertical", &self.vertical)
            .field("variant", &self.variant())
            .field("shaper", &self.shaper.name())
            .finish()
    }
}
