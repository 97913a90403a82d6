//! Dual-channel composition.
//!
//! This module turns a premultiplied RGBA frame into two rasters twice as
//! wide as the source:
//! - A dual-channel image: straight color in one half, alpha replicated as
//!   opaque gray in the other
//! - A black-background composite: the dual-channel image flattened onto black
//!
//! # Architecture
//!
//! - [`ComposedPixel`] - pure per-pixel transform
//! - [`DualChannelKernel`] - pixel and block processing over borrowed buffers
//! - [`compose_frame`] / [`compose_frames`] - owned outputs for whole frames
//!
//! The kernel never allocates; callers own all three buffers.
//!
//! # Examples
//!
//! ```ignore
//! use dualchannel_core::compose::{process_block, LayoutMode};
//!
//! let frame = [200u8, 100, 50, 128, 0, 0, 0, 0]; // 2x1, premultiplied
//! let mut dual = vec![0u8; 4 * 4];
//! let mut black = vec![0u8; 4 * 4];
//! process_block(0, 0, 2, 1, &frame, 2, 4, &mut dual, &mut black, LayoutMode::ColorLeftAlphaRight)?;
//! ```

mod frame;
mod kernel;
mod pixel;
mod types;
mod view;

pub use frame::{compose_frame, compose_frames, DualChannelFrame, FrameProgress};
pub use kernel::{process_block, process_single_pixel, DualChannelKernel};
pub use pixel::{alpha_as_gray, blend_on_black, unpremultiply, ComposedPixel};
pub use types::{split_into_blocks, Block, ComposeError, LayoutMode, DEFAULT_BLOCK_SIZE};
pub use view::{DualChannelBuffers, SourceFrame, BYTES_PER_PIXEL};
