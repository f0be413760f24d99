//! Error types for fontinst
//!
//! Only construction can fail. Everything a layout engine asks a ready
//! instance answers with a value or a sentinel, so these types describe
//! what went wrong while a face was being brought up.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FontInstError>;

/// Main error type for fontinst
#[derive(Debug, Error)]
pub enum FontInstError {
    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Platform variant failed: {0}")]
    Platform(#[from] BackendError),
}

impl FontInstError {
    /// Status code for callers that speak integers rather than enums
    pub fn code(&self) -> i32 {
        match self {
            FontInstError::FontLoad(e) => e.code(),
            FontInstError::Platform(_) => 10,
        }
    }
}

/// Why a font instance could not be constructed
///
/// Each variant maps to a distinct [`code`](FontLoadError::code) so the
/// failure can be reported out-of-band as a plain status.
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read font at {}: {}", path.display(), source)]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Font file too large: {} bytes (max: {} bytes) at {}", size, max, path.display())]
    FontTooLarge { path: PathBuf, size: u64, max: u64 },

    #[error("Failed to allocate {size} bytes for font data")]
    Allocation { size: u64 },

    #[error("Face index {index} out of range (resource has {count} face(s))")]
    FaceIndexOutOfRange { index: u32, count: u32 },

    #[error("Unsupported font format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid font metrics: {0}")]
    InvalidMetrics(String),

    #[error("Invalid point size: {0}")]
    InvalidPointSize(f32),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

impl FontLoadError {
    /// Stable non-zero status code for this failure
    pub fn code(&self) -> i32 {
        match self {
            FontLoadError::FileNotFound { .. } => 1,
            FontLoadError::Unreadable { .. } => 2,
            FontLoadError::FontTooLarge { .. } => 3,
            FontLoadError::Allocation { .. } => 4,
            FontLoadError::FaceIndexOutOfRange { .. } => 5,
            FontLoadError::UnsupportedFormat(_) => 6,
            FontLoadError::InvalidMetrics(_) => 7,
            FontLoadError::InvalidPointSize(_) => 8,
            FontLoadError::Backend(_) => 9,
        }
    }
}

/// A shaping or platform backend refused to create its handle
#[derive(Debug, Error)]
#[error("{backend}: {reason}")]
pub struct BackendError {
    pub backend: &'static str,
    pub reason: String,
}

impl BackendError {
    pub fn new(backend: &'static str, reason: impl Into<String>) -> Self {
        Self {
            backend,
            reason: reason.into(),
        }
    }
}
