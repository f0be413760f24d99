// this_file: crates/fontinst/tests/common/mod.rs

//! Counting test doubles for every backend seam.
//!
//! Each handle records its creation and release in a shared [`Counters`],
//! so tests can assert one release per acquired handle and the order the
//! teardown path ran in.

#![allow(dead_code)]

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;
use std::sync::Arc;

use fontinst::{
    types::{FaceMetrics, GlyphBBox, GlyphId, Tag, Variant},
    BackendError, FontData, FontLoadError, OutlineBackend, OutlineFace, PlatformBackend,
    PlatformResources, ShapingBackend, ShapingHandle,
};

/// Shared ledger of handle lifetimes
#[derive(Debug, Default)]
pub struct Counters {
    pub faces_opened: Cell<u32>,
    pub faces_released: Cell<u32>,
    pub shapers_created: Cell<u32>,
    pub shapers_released: Cell<u32>,
    pub platforms_attached: Cell<u32>,
    pub platforms_released: Cell<u32>,
    pub platforms_dropped: Cell<u32>,
    pub events: RefCell<Vec<&'static str>>,
}

impl Counters {
    fn bump(cell: &Cell<u32>) {
        cell.set(cell.get() + 1);
    }

    fn record(&self, event: &'static str) {
        self.events.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.events.borrow().clone()
    }
}

/// What the mock face reports, in font units
#[derive(Debug, Clone)]
pub struct MockFontSpec {
    pub face_count: u32,
    pub metrics: FaceMetrics,
    pub num_glyphs: u32,
    pub cmap: Vec<(u32, GlyphId)>,
    pub names: Vec<(GlyphId, &'static str)>,
    pub advances: HashMap<GlyphId, f32>,
    pub vertical_advances: HashMap<GlyphId, f32>,
    pub bounds: HashMap<GlyphId, GlyphBBox>,
    pub tables: Vec<(Tag, Vec<u8>)>,
}

impl Default for MockFontSpec {
    /// A 1000-upem upright face with glyphs for 'A' (1) and 'g' (2)
    fn default() -> Self {
        Self {
            face_count: 1,
            metrics: FaceMetrics {
                units_per_em: 1000,
                ascent: 800.0,
                descent: -200.0,
                cap_height: Some(700.0),
                x_height: Some(500.0),
                italic_angle: 0.0,
            },
            num_glyphs: 3,
            cmap: vec![(0x41, 1), (0x67, 2)],
            names: vec![(0, ".notdef"), (1, "A"), (2, "g")],
            advances: HashMap::from([(0, 500.0), (1, 600.0), (2, 550.0)]),
            vertical_advances: HashMap::from([(1, 1000.0), (2, 1000.0)]),
            bounds: HashMap::from([
                (1, GlyphBBox::new(10.0, 0.0, 590.0, 700.0)),
                (2, GlyphBBox::new(30.0, -200.0, 520.0, 500.0)),
            ]),
            tables: vec![(Tag::new(b"head"), vec![0, 1, 0, 0])],
        }
    }
}

/// Outline backend double; rejects data starting with `BAD`
pub struct MockOutlineBackend {
    pub counters: Rc<Counters>,
    pub spec: MockFontSpec,
}

impl MockOutlineBackend {
    pub fn new(counters: Rc<Counters>, spec: MockFontSpec) -> Self {
        Self { counters, spec }
    }
}

impl OutlineBackend for MockOutlineBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn open_face(
        &self,
        data: Arc<FontData>,
        companion: Option<Arc<FontData>>,
        face_index: u32,
    ) -> Result<Box<dyn OutlineFace>, FontLoadError> {
        if data.starts_with(b"BAD") {
            return Err(FontLoadError::UnsupportedFormat("mock rejects BAD".into()));
        }
        if face_index >= self.spec.face_count {
            return Err(FontLoadError::FaceIndexOutOfRange {
                index: face_index,
                count: self.spec.face_count,
            });
        }
        Counters::bump(&self.counters.faces_opened);
        Ok(Box::new(MockFace {
            counters: Rc::clone(&self.counters),
            spec: self.spec.clone(),
            _data: data,
            companion,
        }))
    }
}

pub struct MockFace {
    counters: Rc<Counters>,
    spec: MockFontSpec,
    _data: Arc<FontData>,
    companion: Option<Arc<FontData>>,
}

impl OutlineFace for MockFace {
    fn metrics(&self) -> FaceMetrics {
        self.spec.metrics
    }

    fn num_glyphs(&self) -> u32 {
        self.spec.num_glyphs
    }

    fn map_char(&self, codepoint: u32) -> Option<GlyphId> {
        self.spec
            .cmap
            .iter()
            .find(|(cp, _)| *cp == codepoint)
            .map(|(_, gid)| *gid)
    }

    fn first_char_code(&self) -> Option<u32> {
        self.spec.cmap.iter().map(|(cp, _)| *cp).min()
    }

    fn last_char_code(&self) -> Option<u32> {
        self.spec.cmap.iter().map(|(cp, _)| *cp).max()
    }

    fn glyph_name(&self, glyph_id: GlyphId) -> Option<String> {
        self.spec
            .names
            .iter()
            .find(|(gid, _)| *gid == glyph_id)
            .map(|(_, name)| name.to_string())
    }

    fn glyph_by_name(&self, name: &str) -> Option<GlyphId> {
        self.spec
            .names
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(gid, _)| *gid)
    }

    fn advance(&self, glyph_id: GlyphId, vertical: bool) -> Option<f32> {
        if vertical {
            self.spec.vertical_advances.get(&glyph_id).copied()
        } else {
            self.spec.advances.get(&glyph_id).copied()
        }
    }

    fn bounds(&self, glyph_id: GlyphId) -> Option<GlyphBBox> {
        self.spec.bounds.get(&glyph_id).copied()
    }

    fn table(&self, tag: Tag) -> Option<&[u8]> {
        if let Some((_, bytes)) = self.spec.tables.iter().find(|(t, _)| *t == tag) {
            return Some(bytes.as_slice());
        }
        // Companion tables are the companion file's raw bytes under `cmpn`
        if tag == Tag::new(b"cmpn") {
            return self.companion.as_deref().map(FontData::as_bytes);
        }
        None
    }
}

impl Drop for MockFace {
    fn drop(&mut self) {
        Counters::bump(&self.counters.faces_released);
        self.counters.record("face");
    }
}

/// Shaping backend double; fails on demand
pub struct MockShapingBackend {
    pub counters: Rc<Counters>,
    pub fail: bool,
}

impl MockShapingBackend {
    pub fn new(counters: Rc<Counters>) -> Self {
        Self {
            counters,
            fail: false,
        }
    }

    pub fn failing(counters: Rc<Counters>) -> Self {
        Self {
            counters,
            fail: true,
        }
    }
}

impl ShapingBackend for MockShapingBackend {
    fn name(&self) -> &'static str {
        "mock-shaper"
    }

    fn create_handle(
        &self,
        data: Arc<FontData>,
        face_index: u32,
        units_per_em: u16,
    ) -> Result<Box<dyn ShapingHandle>, BackendError> {
        if self.fail {
            return Err(BackendError::new("mock-shaper", "refused"));
        }
        Counters::bump(&self.counters.shapers_created);
        Ok(Box::new(MockShaper {
            counters: Rc::clone(&self.counters),
            _data: data,
            face_index,
            units_per_em,
        }))
    }
}

pub struct MockShaper {
    counters: Rc<Counters>,
    _data: Arc<FontData>,
    pub face_index: u32,
    pub units_per_em: u16,
}

impl ShapingHandle for MockShaper {
    fn name(&self) -> &'static str {
        "mock-shaper"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockShaper {
    fn drop(&mut self) {
        Counters::bump(&self.counters.shapers_released);
        self.counters.record("shaper");
    }
}

/// Platform variant double reporting itself as CoreText
pub struct MockPlatformBackend {
    pub counters: Rc<Counters>,
    pub fail: bool,
}

impl PlatformBackend for MockPlatformBackend {
    fn variant(&self) -> Variant {
        Variant::CoreText
    }

    fn attach(
        &self,
        _data: &Arc<FontData>,
        _face_index: u32,
        point_size: f32,
    ) -> Result<Box<dyn PlatformResources>, BackendError> {
        if self.fail {
            return Err(BackendError::new("mock-platform", "no native font"));
        }
        Counters::bump(&self.counters.platforms_attached);
        Ok(Box::new(MockPlatformResources {
            counters: Rc::clone(&self.counters),
            point_size,
        }))
    }
}

pub struct MockPlatformResources {
    counters: Rc<Counters>,
    pub point_size: f32,
}

impl PlatformResources for MockPlatformResources {
    fn variant(&self) -> Variant {
        Variant::CoreText
    }

    fn release(&mut self) {
        Counters::bump(&self.counters.platforms_released);
        self.counters.record("platform-release");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockPlatformResources {
    fn drop(&mut self) {
        Counters::bump(&self.counters.platforms_dropped);
        self.counters.record("platform-drop");
    }
}

/// A file on disk for the loader to read; contents only matter to the
/// mock's `BAD` check
pub fn font_file(contents: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp font file");
    file.write_all(contents).expect("write temp font file");
    file.flush().expect("flush temp font file");
    file
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
