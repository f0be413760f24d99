//! fontinst: a font face, sized and ready for layout
//!
//! A layout engine needs the same few answers from every font: how tall,
//! how wide, which glyph, how far does the ink reach. [`FontInstance`]
//! gives those answers in points, whatever library actually parsed the
//! file.
//!
//! ## Quick start
//!
//! ```no_run
//! use fontinst::FontInstance;
//!
//! let font = FontInstance::open("fonts/NotoSans-Regular.ttf", 0, 10.0)?;
//!
//! let gid = font.map_char_to_glyph('A' as u32);
//! let width = font.glyph_width(gid);
//! let (height, depth) = font.glyph_height_depth(gid);
//! println!("A: {width}pt wide, {height}pt up, {depth}pt down");
//!
//! font.destroy();
//! # Ok::<(), fontinst::FontInstError>(())
//! ```
//!
//! ## Failing soft
//!
//! Only construction returns errors. A missing character maps to
//! [`NOTDEF_GLYPH`](types::NOTDEF_GLYPH), a glyph id past the end of the
//! face has zero width and a zero box, a missing table is `None`. Check
//! for those values when they matter to you.
//!
//! ## Backends
//!
//! Outlines and metrics come from `fontinst-outline-skrifa`. The shaping
//! handle comes from `fontinst-shape-hb` (feature `shaping-hb`, on by
//! default) or `fontinst-shape-none`. On macOS, `CoreTextBackend` attaches
//! a native CTFont and makes the instance the CoreText variant. Anything
//! implementing the traits in [`fontinst_core::traits`] can be plugged in
//! through [`OpenOptions`].

mod instance;
mod options;

pub use instance::FontInstance;
pub use options::OpenOptions;

pub use fontinst_core::{
    error, traits, types, BackendError, FontData, FontInstError, FontLoadError, LoadConfig,
    OutlineBackend, OutlineFace, PlatformBackend, PlatformResources, Result, ShapingBackend,
    ShapingHandle,
};
#[cfg(target_os = "macos")]
pub use fontinst_os_mac::{CoreTextBackend, CoreTextResources};
pub use fontinst_outline_skrifa::SkrifaBackend;
#[cfg(feature = "shaping-hb")]
pub use fontinst_shape_hb::{HarfBuzzBackend, HbShapingHandle};
pub use fontinst_shape_none::NoneBackend;
