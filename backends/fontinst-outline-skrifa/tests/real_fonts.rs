//! Face queries against real CFF and TrueType fonts
//!
//! The fonts come from HarfBuzz's test corpus, found through
//! `FONTINST_TEST_FONTS` or the `harfbuzz-sys` sources in the cargo
//! registry. Each test returns early when its font is not available.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use fontinst_core::{types::Tag, FontData, LoadConfig, OutlineBackend, OutlineFace};
use fontinst_outline_skrifa::SkrifaBackend;

const CFF_FONT: &str = "SourceSansPro-Regular.otf";
const POST_NAMES_FONT: &str = "OpenSans-Regular.ttf";
const NAMELESS_FONT: &str = "Roboto-Regular.abc.ttf";
const EMPTY_CMAP_FONT: &str = "Roboto-Regular.empty.ttf";
const VERTICAL_FONT: &str = "SourceHanSans-Regular.41,4C2E.otf";

fn test_font(name: &str) -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("FONTINST_TEST_FONTS") {
        let path = PathBuf::from(dir).join(name);
        return path.exists().then_some(path);
    }
    let cargo_home = std::env::var_os("CARGO_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cargo")))?;
    let indexes = std::fs::read_dir(cargo_home.join("registry").join("src")).ok()?;
    indexes
        .flatten()
        .filter_map(|index| std::fs::read_dir(index.path()).ok())
        .flatten()
        .flatten()
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("harfbuzz-sys-"))
        .map(|entry| entry.path().join("harfbuzz/test/api/fonts").join(name))
        .find(|path| path.exists())
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn load(name: &str) -> Option<Arc<FontData>> {
    let path = test_font(name)?;
    Some(Arc::new(FontData::load(&path, &LoadConfig::default()).unwrap()))
}

fn open(name: &str) -> Option<Box<dyn OutlineFace>> {
    let data = load(name)?;
    Some(SkrifaBackend::new().open_face(data, None, 0).unwrap())
}

#[test]
fn test_cff_glyph_names_come_from_the_charset() {
    init_logging();
    let Some(face) = open(CFF_FONT) else {
        return;
    };

    let a = face.map_char('a' as u32).unwrap();
    assert_eq!(face.glyph_name(a).as_deref(), Some("a"));
    assert_eq!(face.glyph_by_name("a"), Some(a));
    assert_eq!(face.glyph_name(0).as_deref(), Some(".notdef"));
    assert_eq!(face.glyph_by_name("no.such.glyph"), None);
}

#[test]
fn test_post_glyph_names_round_trip() {
    let Some(face) = open(POST_NAMES_FONT) else {
        return;
    };

    for ch in ['A', 'g', 'z'] {
        let gid = face.map_char(ch as u32).unwrap();
        let name = face.glyph_name(gid).unwrap();
        assert_eq!(name, ch.to_string());
        assert_eq!(face.glyph_by_name(&name), Some(gid));
    }
}

#[test]
fn test_font_without_stored_names_has_none() {
    let Some(face) = open(NAMELESS_FONT) else {
        return;
    };

    let a = face.map_char('a' as u32).unwrap();
    assert_eq!(face.glyph_name(a), None);
    assert_eq!(face.glyph_by_name(&format!("gid{a}")), None);
}

#[test]
fn test_cff_bounds_come_from_the_outline() {
    let Some(face) = open(CFF_FONT) else {
        return;
    };

    let a = face.map_char('a' as u32).unwrap();
    let bbox = face.bounds(a).unwrap();
    assert!(bbox.x_max > bbox.x_min);
    assert!(bbox.y_max > 0.0);
    assert!(bbox.x_max <= face.advance(a, false).unwrap() + 50.0);

    let p = face.map_char('p' as u32).unwrap();
    assert!(face.bounds(p).unwrap().y_min < 0.0);
}

#[test]
fn test_vertical_advance_from_vmtx() {
    let Some(face) = open(VERTICAL_FONT) else {
        return;
    };

    let a = face.map_char('A' as u32).unwrap();
    assert_eq!(face.advance(a, true), Some(1000.0));
}

#[test]
fn test_vertical_advance_falls_back_to_line_height() {
    let Some(face) = open(NAMELESS_FONT) else {
        return;
    };

    let metrics = face.metrics();
    let a = face.map_char('a' as u32).unwrap();
    assert_eq!(face.table(Tag::new(b"vmtx")), None);
    assert_eq!(face.advance(a, true), Some(metrics.ascent - metrics.descent));
    assert_ne!(face.advance(a, false), face.advance(a, true));
}

#[test]
fn test_empty_cmap_maps_nothing() {
    let Some(face) = open(EMPTY_CMAP_FONT) else {
        return;
    };

    assert_eq!(face.first_char_code(), None);
    assert_eq!(face.last_char_code(), None);
    assert_eq!(face.map_char('a' as u32), None);
    assert_eq!(face.num_glyphs(), 1);
}

#[test]
fn test_companion_supplies_missing_tables() {
    init_logging();
    let (Some(primary), Some(companion_path)) = (load(NAMELESS_FONT), test_font(CFF_FONT)) else {
        return;
    };

    // The loader reads the companion from its own copy
    let mut copy = tempfile::NamedTempFile::new().unwrap();
    copy.write_all(&std::fs::read(&companion_path).unwrap()).unwrap();
    copy.flush().unwrap();
    let companion = Arc::new(FontData::load(copy.path(), &LoadConfig::default()).unwrap());

    let cff = Tag::new(b"CFF ");
    let alone = SkrifaBackend::new()
        .open_face(Arc::clone(&primary), None, 0)
        .unwrap();
    assert_eq!(alone.table(cff), None);

    let paired = SkrifaBackend::new()
        .open_face(Arc::clone(&primary), Some(Arc::clone(&companion)), 0)
        .unwrap();
    let from_companion = paired.table(cff).unwrap();
    assert_eq!(&from_companion[..4], &[1, 0, 4, 3][..]);
    assert_eq!(paired.table(Tag::new(b"glyf")), alone.table(Tag::new(b"glyf")));
    assert!(paired.table(Tag::new(b"glyf")).is_some());
}

#[test]
fn test_invalid_companion_is_ignored() {
    let Some(primary) = load(NAMELESS_FONT) else {
        return;
    };

    let junk = Arc::new(FontData::from_vec(b"not a font at all".to_vec()));
    let face = SkrifaBackend::new().open_face(primary, Some(junk), 0).unwrap();
    assert_eq!(face.table(Tag::new(b"CFF ")), None);
}
