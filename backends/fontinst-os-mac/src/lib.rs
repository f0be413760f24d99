//! CoreText platform variant for fontinst
//!
//! Attaching this backend to an instance builds a native `CTFont` over the
//! instance's own backing bytes. The `CGDataProvider` holds a clone of the
//! data `Arc` and drops it from its release callback, so CoreText never
//! reads freed memory even if it outlives the instance's handle on it.
//!
//! Only plain sfnt fonts are supported; CoreText's data provider path has
//! no notion of a face index, so collections are rejected.

#![cfg(target_os = "macos")]

use std::any::Any;
use std::ffi::c_void;
use std::ptr::{self, NonNull};
use std::sync::Arc;

use objc2_core_foundation::{CFRetained, CGFloat};
use objc2_core_graphics::{CGDataProvider, CGFont};
use objc2_core_text::CTFont;

use fontinst_core::{
    error::BackendError,
    traits::{PlatformBackend, PlatformResources},
    types::Variant,
    FontData,
};

const BACKEND: &str = "CoreText";

/// Drops the boxed data `Arc` once CGDataProvider is done with the bytes
#[allow(unsafe_code)]
unsafe extern "C-unwind" fn release_data_callback(
    info: *mut c_void,
    _data: NonNull<c_void>,
    _size: usize,
) {
    if !info.is_null() {
        let _ = unsafe { Box::from_raw(info as *mut Arc<FontData>) };
    }
}

/// Rejects data CoreText would choke on before it reaches CGFont
fn validate_font_data(data: &[u8], face_index: u32) -> Result<(), BackendError> {
    if data.len() < 12 {
        return Err(BackendError::new(BACKEND, "font data too small to be valid"));
    }

    match &data[0..4] {
        [0x00, 0x01, 0x00, 0x00] | [b'O', b'T', b'T', b'O'] | [b't', b'r', b'u', b'e'] => {}
        [b't', b't', b'c', b'f'] => {
            return Err(BackendError::new(
                BACKEND,
                "font collections cannot be attached to CoreText",
            ))
        }
        sig => {
            return Err(BackendError::new(
                BACKEND,
                format!("unrecognized sfnt signature {:02x?}", sig),
            ))
        }
    }

    if face_index != 0 {
        return Err(BackendError::new(
            BACKEND,
            format!("face index {} requested from a single-face font", face_index),
        ));
    }

    Ok(())
}

/// Creates a CGFont whose provider co-owns `data`
#[allow(unsafe_code)]
fn create_cg_font(data: &Arc<FontData>) -> Result<CFRetained<CGFont>, BackendError> {
    let bytes = data.as_bytes();
    let data_ptr = bytes.as_ptr();
    let data_len = bytes.len();

    let info_ptr = Box::into_raw(Box::new(Arc::clone(data))) as *mut c_void;

    // SAFETY: `data_ptr` points into the buffer kept alive by the boxed Arc
    // behind `info_ptr`, which is only freed by `release_data_callback`.
    let provider = unsafe {
        CGDataProvider::with_data(
            info_ptr,
            data_ptr as *const c_void,
            data_len,
            Some(release_data_callback),
        )
    };
    let Some(provider) = provider else {
        // No provider took ownership; reclaim the box ourselves
        let _ = unsafe { Box::from_raw(info_ptr as *mut Arc<FontData>) };
        return Err(BackendError::new(BACKEND, "failed to create CGDataProvider"));
    };

    CGFont::with_data_provider(&provider)
        .ok_or_else(|| BackendError::new(BACKEND, "failed to create CGFont from data"))
}

/// Attaches CoreText fonts to instances
#[derive(Debug, Default, Clone, Copy)]
pub struct CoreTextBackend;

impl CoreTextBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformBackend for CoreTextBackend {
    fn variant(&self) -> Variant {
        Variant::CoreText
    }

    #[allow(unsafe_code)]
    fn attach(
        &self,
        data: &Arc<FontData>,
        face_index: u32,
        point_size: f32,
    ) -> Result<Box<dyn PlatformResources>, BackendError> {
        validate_font_data(data.as_bytes(), face_index)?;

        let cg_font = create_cg_font(data)?;
        let ct_font = unsafe {
            CTFont::with_graphics_font(&cg_font, point_size as CGFloat, ptr::null(), None)
        };

        log::debug!("Created CTFont at {}pt", point_size);

        Ok(Box::new(CoreTextResources {
            ct_font: Some(ct_font),
            point_size,
        }))
    }
}

/// The native font owned by a CoreText instance
pub struct CoreTextResources {
    ct_font: Option<CFRetained<CTFont>>,
    point_size: f32,
}

impl CoreTextResources {
    /// The CTFont, until the instance releases it
    pub fn ct_font(&self) -> Option<&CTFont> {
        self.ct_font.as_deref()
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }
}

impl PlatformResources for CoreTextResources {
    fn variant(&self) -> Variant {
        Variant::CoreText
    }

    fn release(&mut self) {
        if self.ct_font.take().is_some() {
            log::debug!("Released CTFont at {}pt", self.point_size);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
