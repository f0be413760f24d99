// this_file: crates/fontinst-core/src/data.rs

//! Backing buffers for a loaded face.
//!
//! A font file is either memory-mapped or read into an owned buffer,
//! depending on [`LoadConfig`]. Either way the bytes stay put for as long
//! as the [`FontData`] lives, so backends can parse views into it on
//! demand instead of copying tables out.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::ops::Deref;
use std::path::Path;

use memmap2::Mmap;

use crate::config::LoadConfig;
use crate::error::FontLoadError;

/// Raw font bytes, mapped or owned
pub enum FontData {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl FontData {
    /// Loads the file at `path` according to `config`
    ///
    /// # Errors
    /// - [`FontLoadError::FileNotFound`] when nothing exists at `path`
    /// - [`FontLoadError::Unreadable`] for any other I/O failure
    /// - [`FontLoadError::FontTooLarge`] above `config.max_font_size`
    /// - [`FontLoadError::Allocation`] when the owned buffer cannot be reserved
    pub fn load(path: &Path, config: &LoadConfig) -> Result<Self, FontLoadError> {
        let mut file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FontLoadError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => FontLoadError::Unreadable {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let meta = file.metadata().map_err(|e| FontLoadError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        })?;

        if meta.is_dir() {
            return Err(FontLoadError::Unreadable {
                path: path.to_path_buf(),
                source: std::io::Error::other("path is a directory"),
            });
        }

        let size = meta.len();
        if size > config.max_font_size {
            return Err(FontLoadError::FontTooLarge {
                path: path.to_path_buf(),
                size,
                max: config.max_font_size,
            });
        }

        // Zero-length files cannot be mapped everywhere; let the backend
        // reject the empty buffer instead.
        if config.use_mmap && size > 0 {
            // SAFETY: the map is read-only and owned by this FontData. A font
            // file truncated underneath us is the same hazard every mmap-based
            // font loader accepts.
            #[allow(unsafe_code)]
            let mmap = unsafe { Mmap::map(&file) }.map_err(|e| FontLoadError::Unreadable {
                path: path.to_path_buf(),
                source: e,
            })?;
            log::debug!("Mapped {} bytes from {}", mmap.len(), path.display());
            return Ok(FontData::Mapped(mmap));
        }

        let mut buf = Vec::new();
        buf.try_reserve_exact(size as usize)
            .map_err(|_| FontLoadError::Allocation { size })?;
        file.read_to_end(&mut buf)
            .map_err(|e| FontLoadError::Unreadable {
                path: path.to_path_buf(),
                source: e,
            })?;
        log::debug!("Read {} bytes from {}", buf.len(), path.display());
        Ok(FontData::Owned(buf))
    }

    /// Wraps bytes that are already in memory
    pub fn from_vec(data: Vec<u8>) -> Self {
        FontData::Owned(data)
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FontData::Mapped(mmap) => &mmap[..],
            FontData::Owned(vec) => vec.as_slice(),
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, FontData::Mapped(_))
    }
}

impl Deref for FontData {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for FontData {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("mapped", &self.is_mapped())
            .field("len", &self.len())
            .finish()
    }
}
