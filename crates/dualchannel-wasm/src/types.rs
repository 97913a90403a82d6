//! WASM-compatible wrapper types for composed frames.

use dualchannel_core::DualChannelFrame;
use wasm_bindgen::prelude::*;

/// A composed frame wrapper for JavaScript.
///
/// Holds both output rasters in WASM memory. `dual_pixels()` and
/// `black_bg_pixels()` copy into a fresh `Uint8Array`, so prefer
/// `encodeComposite` when only the encoded bytes are needed. The generated
/// `free()` releases the WASM memory early.
#[wasm_bindgen]
pub struct JsDualChannelFrame {
    inner: DualChannelFrame,
}

#[wasm_bindgen]
impl JsDualChannelFrame {
    /// Output width in pixels (twice the source width)
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Output height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Bytes in one output raster (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.byte_size()
    }

    /// Dual-channel RGBA data as Uint8Array (copied).
    pub fn dual_pixels(&self) -> Vec<u8> {
        self.inner.dual.clone()
    }

    /// Black-background RGBA data as Uint8Array (copied).
    pub fn black_bg_pixels(&self) -> Vec<u8> {
        self.inner.black_bg.clone()
    }
}

impl JsDualChannelFrame {
    pub(crate) fn from_core(inner: DualChannelFrame) -> Self {
        Self { inner }
    }

    pub(crate) fn inner(&self) -> &DualChannelFrame {
        &self.inner
    }
}
