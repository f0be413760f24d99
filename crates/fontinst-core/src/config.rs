//! How font data gets into memory
//!
//! Fonts are memory-mapped by default and refused above 50 MiB. Both can
//! be changed per open through [`LoadConfig`], or process-wide through the
//! environment:
//!
//! ```bash
//! FONTINST_MMAP=0 FONTINST_MAX_FONT_SIZE=104857600 ./my_app
//! ```
//!
//! The environment is read once, on the first call to
//! [`LoadConfig::from_env`].

use std::sync::OnceLock;

/// Default ceiling on font file size (50 MiB)
pub const DEFAULT_MAX_FONT_SIZE: u64 = 50 * 1024 * 1024;

/// Knobs for loading a font resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadConfig {
    /// Map the file instead of reading it into an owned buffer
    pub use_mmap: bool,
    /// Files larger than this are rejected before any allocation
    pub max_font_size: u64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            use_mmap: true,
            max_font_size: DEFAULT_MAX_FONT_SIZE,
        }
    }
}

static ENV_CONFIG: OnceLock<LoadConfig> = OnceLock::new();

impl LoadConfig {
    /// Defaults, overridden by `FONTINST_MMAP` and `FONTINST_MAX_FONT_SIZE`
    pub fn from_env() -> Self {
        *ENV_CONFIG.get_or_init(|| {
            Self::from_vars(
                std::env::var("FONTINST_MMAP").ok().as_deref(),
                std::env::var("FONTINST_MAX_FONT_SIZE").ok().as_deref(),
            )
        })
    }

    fn from_vars(mmap: Option<&str>, max_size: Option<&str>) -> Self {
        let mut config = Self::default();

        if let Some(val) = mmap {
            match parse_flag(val) {
                Some(enabled) => {
                    config.use_mmap = enabled;
                    log::info!(
                        "fontinst memory mapping {} via FONTINST_MMAP",
                        if enabled { "enabled" } else { "disabled" }
                    );
                }
                None => log::warn!("Ignoring unrecognized FONTINST_MMAP value '{}'", val),
            }
        }

        if let Some(val) = max_size {
            match val.trim().parse::<u64>() {
                Ok(size) if size > 0 => {
                    config.max_font_size = size;
                    log::info!("fontinst max font size set to {} bytes via env", size);
                }
                _ => log::warn!("Ignoring invalid FONTINST_MAX_FONT_SIZE value '{}'", val),
            }
        }

        config
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn with_max_font_size(mut self, max_font_size: u64) -> Self {
        self.max_font_size = max_font_size;
        self
    }
}

fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
