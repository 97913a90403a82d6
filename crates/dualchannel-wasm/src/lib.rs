//! Dual-Channel WASM - WebAssembly bindings for the composition kernel
//!
//! This crate exposes dualchannel-core to the JavaScript worker that captures
//! frames and ships the composites.
//!
//! # Module Structure
//!
//! - `kernel` - Per-pixel and per-block entry points over caller-owned buffers
//! - `compose` - Whole-frame and batch composition with encoding
//! - `types` - WASM-compatible wrapper for composed frames
//! - `logging` - Forwarding of `log` records to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import wasmInit, { init, processBlock } from '@dualchannel/wasm';
//!
//! await wasmInit();
//! init();
//!
//! // Whole frame, color on the left
//! processBlock(0, 0, width, height, frame, width, width * 2, dual, blackBg, 1);
//! ```

use wasm_bindgen::prelude::*;

mod compose;
mod kernel;
mod logging;
mod types;

// Re-export public types
pub use compose::{compose_frame, compose_frames, composite_mime_type, encode_composite};
pub use kernel::{process_block, process_single_pixel};
pub use logging::enable_console_logging;
pub use types::JsDualChannelFrame;

/// Lifecycle hook; safe to omit, safe to call more than once.
#[wasm_bindgen]
pub fn init() {
    dualchannel_core::init();
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }
}
