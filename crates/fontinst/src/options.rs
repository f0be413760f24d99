//! Choosing how an instance gets built
//!
//! [`OpenOptions`] collects everything construction needs beyond the
//! path, face index and size: the load configuration, an optional
//! companion resource, and which backends to use.
//!
//! ```no_run
//! use fontinst::{LoadConfig, OpenOptions};
//!
//! let font = OpenOptions::new()
//!     .config(LoadConfig::default().with_mmap(false))
//!     .open("fonts/NotoSans-Regular.ttf", 0, 12.0)?;
//! assert_eq!(font.point_size(), 12.0);
//! # Ok::<(), fontinst::FontInstError>(())
//! ```

use std::path::{Path, PathBuf};

use fontinst_core::{error::Result, LoadConfig, OutlineBackend, PlatformBackend, ShapingBackend};
use fontinst_outline_skrifa::SkrifaBackend;

use crate::instance::FontInstance;

/// Builder for [`FontInstance`]
pub struct OpenOptions<'a> {
    pub(crate) config: LoadConfig,
    pub(crate) companion: Option<PathBuf>,
    pub(crate) outline: &'a dyn OutlineBackend,
    pub(crate) shaping: &'a dyn ShapingBackend,
    pub(crate) platform: Option<&'a dyn PlatformBackend>,
}

impl<'a> OpenOptions<'a> {
    /// Default backends, configuration from the environment
    pub fn new() -> Self {
        Self {
            config: LoadConfig::from_env(),
            companion: None,
            outline: &SkrifaBackend,
            shaping: default_shaping_backend(),
            platform: None,
        }
    }

    pub fn config(mut self, config: LoadConfig) -> Self {
        self.config = config;
        self
    }

    /// A second resource consulted for tables the primary font lacks
    ///
    /// A companion that cannot be loaded is skipped with a warning; it
    /// never fails construction.
    pub fn companion(mut self, path: impl AsRef<Path>) -> Self {
        self.companion = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn outline_backend(mut self, backend: &'a dyn OutlineBackend) -> Self {
        self.outline = backend;
        self
    }

    pub fn shaping_backend(mut self, backend: &'a dyn ShapingBackend) -> Self {
        self.shaping = backend;
        self
    }

    /// Builds instances as this backend's platform variant
    pub fn platform(mut self, backend: &'a dyn PlatformBackend) -> Self {
        self.platform = Some(backend);
        self
    }

    /// Loads face `face_index` of the font at `path` at `point_size`
    pub fn open(
        &self,
        path: impl AsRef<Path>,
        face_index: u32,
        point_size: f32,
    ) -> Result<FontInstance> {
        FontInstance::initialize(self, path.as_ref(), face_index, point_size)
    }
}

impl Default for OpenOptions<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "shaping-hb")]
fn default_shaping_backend() -> &'static dyn ShapingBackend {
    &fontinst_shape_hb::HarfBuzzBackend
}

#[cfg(not(feature = "shaping-hb"))]
fn default_shaping_backend() -> &'static dyn ShapingBackend {
    &fontinst_shape_none::NoneBackend
}
