//! None shaping backend - a handle with no engine behind it
//!
//! For builds without HarfBuzz and for tests that only care about metrics.
//! The handle records which face it was bound to and nothing else.

use std::any::Any;
use std::sync::Arc;

use fontinst_core::{
    error::BackendError,
    traits::{ShapingBackend, ShapingHandle},
    FontData,
};

/// A backend whose handles cannot shape anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoneBackend;

impl NoneBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ShapingBackend for NoneBackend {
    fn name(&self) -> &'static str {
        "none"
    }

    fn create_handle(
        &self,
        data: Arc<FontData>,
        face_index: u32,
        units_per_em: u16,
    ) -> Result<Box<dyn ShapingHandle>, BackendError> {
        log::debug!("NoneBackend: binding face {} ({} bytes)", face_index, data.len());
        Ok(Box::new(NoneHandle {
            face_index,
            units_per_em,
        }))
    }
}

/// What a none handle remembers about its face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoneHandle {
    pub face_index: u32,
    pub units_per_em: u16,
}

impl ShapingHandle for NoneHandle {
    fn name(&self) -> &'static str {
        "none"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
