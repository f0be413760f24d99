//! fontinst core: the vocabulary every font instance speaks
//!
//! A font instance is one loaded face at one point size. Parsing the font,
//! mapping characters and shaping text all belong to backends; this crate
//! holds what the backends and the instance agree on.
//!
//! ## What lives here
//!
//! - [`types`] - glyph ids, bounding boxes, table tags, sentinels
//! - [`traits`] - the seams: [`OutlineBackend`], [`ShapingBackend`],
//!   [`PlatformBackend`] and [`PlatformResources`]
//! - [`error`] - construction failures and their status codes
//! - [`config`] - how font data is loaded (mmap or read, size limit)
//! - [`data`] - the backing buffers themselves
//!
//! Soft failures never show up as errors. A missing glyph is glyph 0, a
//! missing table is `None`, an unknown name is an empty result. Only
//! construction can fail.

pub mod config;
pub mod data;
pub mod error;
pub mod traits;

pub use config::LoadConfig;
pub use data::FontData;
pub use error::{BackendError, FontInstError, FontLoadError, Result};
pub use traits::{
    OutlineBackend, OutlineFace, PlatformBackend, PlatformResources, ShapingBackend, ShapingHandle,
};

/// The data structures shared between the instance and its backends
pub mod types {
    use std::fmt;

    /// Unique identifier for a glyph within a face
    pub type GlyphId = u32;

    /// The glyph every font has at index 0 and every failed lookup returns
    pub const NOTDEF_GLYPH: GlyphId = 0;

    /// Returned by first/last char-code queries when the cmap is empty
    pub const NO_CHAR_CODE: u32 = u32::MAX;

    /// A glyph's extent, either in font units or in points
    ///
    /// y grows upward from the baseline, so `y_min` is negative for
    /// glyphs with descenders.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct GlyphBBox {
        pub x_min: f32,
        pub y_min: f32,
        pub x_max: f32,
        pub y_max: f32,
    }

    impl GlyphBBox {
        /// The zero-extent box handed out for glyphs that have no outline
        pub const ZERO: GlyphBBox = GlyphBBox {
            x_min: 0.0,
            y_min: 0.0,
            x_max: 0.0,
            y_max: 0.0,
        };

        pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
            Self {
                x_min,
                y_min,
                x_max,
                y_max,
            }
        }

        /// Multiplies every edge by `factor`
        pub fn scaled(self, factor: f32) -> Self {
            Self {
                x_min: self.x_min * factor,
                y_min: self.y_min * factor,
                x_max: self.x_max * factor,
                y_max: self.y_max * factor,
            }
        }
    }

    /// A four-byte OpenType table tag such as `head` or `OS/2`
    #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Tag([u8; 4]);

    impl Tag {
        pub const fn new(bytes: &[u8; 4]) -> Self {
            Tag(*bytes)
        }

        pub const fn to_bytes(self) -> [u8; 4] {
            self.0
        }
    }

    impl fmt::Display for Tag {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            for &b in &self.0 {
                if b.is_ascii_graphic() || b == b' ' {
                    write!(f, "{}", b as char)?;
                } else {
                    write!(f, "\\x{:02x}", b)?;
                }
            }
            Ok(())
        }
    }

    impl fmt::Debug for Tag {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Tag({})", self)
        }
    }

    /// The backend-native way of naming the common sfnt tables
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum SfntTable {
        Head,
        Maxp,
        Os2,
        Hhea,
        Vhea,
        Post,
        Pclt,
    }

    impl SfntTable {
        pub const ALL: [SfntTable; 7] = [
            SfntTable::Head,
            SfntTable::Maxp,
            SfntTable::Os2,
            SfntTable::Hhea,
            SfntTable::Vhea,
            SfntTable::Post,
            SfntTable::Pclt,
        ];

        /// The OpenType tag this table is stored under
        pub const fn tag(self) -> Tag {
            match self {
                SfntTable::Head => Tag::new(b"head"),
                SfntTable::Maxp => Tag::new(b"maxp"),
                SfntTable::Os2 => Tag::new(b"OS/2"),
                SfntTable::Hhea => Tag::new(b"hhea"),
                SfntTable::Vhea => Tag::new(b"vhea"),
                SfntTable::Post => Tag::new(b"post"),
                SfntTable::Pclt => Tag::new(b"PCLT"),
            }
        }
    }

    /// Which platform flavour an instance was built as
    ///
    /// Every variant honors the same query contract; they differ only in
    /// the extra native resources released at teardown.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub enum Variant {
        /// Outline and shaping backends only, no platform font handle
        #[default]
        Portable,
        /// Additionally holds a CoreText font (macOS)
        CoreText,
    }

    impl Variant {
        pub fn name(self) -> &'static str {
            match self {
                Variant::Portable => "portable",
                Variant::CoreText => "coretext",
            }
        }
    }

    /// Face-wide metrics as the outline backend reports them, in font units
    ///
    /// `descent` keeps the backend's sign: negative below the baseline.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct FaceMetrics {
        pub units_per_em: u16,
        pub ascent: f32,
        pub descent: f32,
        pub cap_height: Option<f32>,
        pub x_height: Option<f32>,
        /// Degrees, counter-clockwise from vertical; negative for
        /// conventional right-leaning italics
        pub italic_angle: f32,
    }
}
