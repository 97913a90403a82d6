//! Core types for dual-channel composition.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default tile edge used when a frame is split into blocks.
pub const DEFAULT_BLOCK_SIZE: u32 = 128;

/// Error types for composition operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The dual-channel raster is not exactly twice as wide as the source frame.
    #[error("Invalid geometry: dual-channel width ({dual_width}) must be twice the frame width ({width})")]
    InvalidGeometry { width: u32, dual_width: u32 },

    /// A caller-supplied buffer cannot hold the requested raster.
    #[error("Invalid {buffer} buffer: expected at least {expected} bytes, got {actual}")]
    BufferTooSmall {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A pixel coordinate lies outside the frame.
    #[error("Pixel ({x}, {y}) is outside the {width}x{height} frame")]
    IndexOutOfRange { x: u32, y: u32, width: u32, height: u32 },

    /// A block extends past the frame.
    #[error("Block {block} exceeds the {width}x{height} frame")]
    BlockOutOfRange { block: Block, width: u32, height: u32 },

    /// A signed boundary argument was negative.
    #[error("Invalid argument {name}: {value} must not be negative")]
    NegativeArgument { name: &'static str, value: i32 },

    /// Layout mode name not recognized.
    #[error("Unknown layout mode: {0}")]
    UnknownMode(String),

    /// A batch was requested without frames.
    #[error("Frame sequence is empty")]
    EmptyFrames,

    /// A frame in a batch does not match the first frame's dimensions.
    #[error("Frame {index} is {actual_width}x{actual_height}, expected {width}x{height}")]
    FrameSizeMismatch {
        index: usize,
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// The progress callback asked to stop.
    #[error("Composition cancelled after {completed} of {total} frames")]
    Cancelled { completed: usize, total: usize },
}

/// Which half of the dual-channel raster carries color.
///
/// The other half carries the alpha channel replicated into R, G and B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    /// Color on the left, alpha-as-gray on the right.
    #[default]
    ColorLeftAlphaRight,
    /// Alpha-as-gray on the left, color on the right.
    AlphaLeftColorRight,
}

impl LayoutMode {
    /// Decode the integer flag used by the JS orchestrator (nonzero = color left).
    pub fn from_flag(flag: i32) -> Self {
        if flag != 0 {
            LayoutMode::ColorLeftAlphaRight
        } else {
            LayoutMode::AlphaLeftColorRight
        }
    }

    /// Returns true if the left half carries color.
    #[inline]
    pub fn is_color_left(self) -> bool {
        matches!(self, LayoutMode::ColorLeftAlphaRight)
    }

    /// Identifier used in option objects.
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutMode::ColorLeftAlphaRight => "color-left-alpha-right",
            LayoutMode::AlphaLeftColorRight => "alpha-left-color-right",
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutMode {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "color-left-alpha-right" => Ok(LayoutMode::ColorLeftAlphaRight),
            "alpha-left-color-right" => Ok(LayoutMode::AlphaLeftColorRight),
            other => Err(ComposeError::UnknownMode(other.to_string())),
        }
    }
}

/// A rectangle of source-frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Block {
    /// Left column.
    pub x: u32,
    /// Top row.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Block {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A block covering a whole `width`x`height` frame.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Check if the block covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Exclusive right column, or `None` on overflow.
    pub fn x_end(&self) -> Option<u32> {
        self.x.checked_add(self.width)
    }

    /// Exclusive bottom row, or `None` on overflow.
    pub fn y_end(&self) -> Option<u32> {
        self.y.checked_add(self.height)
    }

    /// Check that the block lies entirely within a `width`x`height` frame.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        matches!(
            (self.x_end(), self.y_end()),
            (Some(x_end), Some(y_end)) if x_end <= width && y_end <= height
        )
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Tile a frame into row-major blocks of at most `block_size`x`block_size` pixels.
///
/// Tiles on the right and bottom edges are clipped to the frame. A `block_size`
/// of zero yields a single block covering the frame.
pub fn split_into_blocks(width: u32, height: u32, block_size: u32) -> Vec<Block> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    if block_size == 0 {
        return vec![Block::full(width, height)];
    }

    let cols = width.div_ceil(block_size);
    let rows = height.div_ceil(block_size);
    let mut blocks = Vec::with_capacity((cols * rows) as usize);

    for row in 0..rows {
        let y = row * block_size;
        for col in 0..cols {
            let x = col * block_size;
            blocks.push(Block::new(
                x,
                y,
                block_size.min(width - x),
                block_size.min(height - y),
            ));
        }
    }

    blocks
}
