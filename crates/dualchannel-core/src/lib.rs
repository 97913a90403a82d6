//! Dual-Channel Core - frame composition library
//!
//! This crate turns premultiplied RGBA frames into dual-channel images (color
//! in one half, alpha as gray in the other) and their black-background
//! composites, and encodes the result for transport.

pub mod compose;
pub mod encode;

pub use compose::{
    compose_frame, compose_frames, process_block, process_single_pixel, Block, ComposeError,
    DualChannelFrame, DualChannelKernel, FrameProgress, LayoutMode, SourceFrame,
    DEFAULT_BLOCK_SIZE,
};
pub use encode::{adaptive_jpeg_quality, encode_composite, EncodeError, OutputFormat};

/// Lifecycle hook for hosts that expect an initialization call.
///
/// There is no global state, so this does nothing.
pub fn init() {}

/// Options controlling composition and encoding
///
/// Every field is optional when deserializing, so a partial options object
/// fills in from [`ComposeOptions::default`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComposeOptions {
    /// Which half carries color
    pub mode: LayoutMode,
    /// Container format for the encoded composite
    pub format: OutputFormat,
    /// JPEG quality (1 to 100); adaptive when unset
    pub quality: Option<u8>,
    /// Tile edge in pixels for sequential composition (0 for a single tile)
    pub block_size: u32,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            mode: LayoutMode::default(),
            format: OutputFormat::default(),
            quality: None,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl ComposeOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout mode
    pub fn with_mode(mut self, mode: LayoutMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// JPEG quality for an output of the given size.
    pub fn jpeg_quality(&self, width: u32, height: u32) -> u8 {
        self.quality
            .unwrap_or_else(|| adaptive_jpeg_quality(width, height))
            .clamp(1, 100)
    }
}
