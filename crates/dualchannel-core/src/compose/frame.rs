//! Whole-frame and batch composition.
//!
//! These helpers own their output buffers, unlike the kernel, and are what
//! a worker calls for each captured frame.

use super::kernel::DualChannelKernel;
use super::types::ComposeError;
use super::view::{rgba_len, DualChannelBuffers, SourceFrame};
use crate::ComposeOptions;
use image::RgbaImage;
use std::ops::ControlFlow;

/// A composed frame: the dual-channel raster and its black-background composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualChannelFrame {
    /// Output width in pixels (twice the source width).
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Dual-channel RGBA data, row-major.
    pub dual: Vec<u8>,
    /// Black-background RGBA data, row-major, always opaque.
    pub black_bg: Vec<u8>,
}

impl DualChannelFrame {
    /// Width of the source frame (one half of the output).
    pub fn source_width(&self) -> u32 {
        self.width / 2
    }

    /// Size in bytes of one output raster.
    pub fn byte_size(&self) -> usize {
        self.dual.len()
    }

    /// Convert the dual-channel raster to an image::RgbaImage.
    pub fn dual_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.dual.clone())
    }

    /// Convert the black-background composite to an image::RgbaImage.
    pub fn black_bg_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.black_bg.clone())
    }
}

/// Batch progress reported after each composed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameProgress {
    /// Frames finished so far.
    pub completed: usize,
    /// Frames in the batch.
    pub total: usize,
}

impl FrameProgress {
    /// Progress from 0.0 to 1.0.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed as f32 / self.total as f32
    }
}

/// Compose one frame into freshly allocated outputs.
///
/// # Example
///
/// ```ignore
/// let frame = SourceFrame::new(&rgba, width, height)?;
/// let composed = compose_frame(&frame, &ComposeOptions::default())?;
/// assert_eq!(composed.width, width * 2);
/// ```
pub fn compose_frame(
    frame: &SourceFrame<'_>,
    options: &ComposeOptions,
) -> Result<DualChannelFrame, ComposeError> {
    let (width, height) = (frame.width(), frame.height());
    let dual_width = width
        .checked_mul(2)
        .ok_or(ComposeError::InvalidDimensions { width, height })?;
    let len = rgba_len(dual_width, height).ok_or(ComposeError::InvalidDimensions { width, height })?;

    let mut dual = vec![0u8; len];
    let mut black_bg = vec![0u8; len];
    {
        let output = DualChannelBuffers::new(&mut dual, &mut black_bg, dual_width, height)?;
        let mut kernel = DualChannelKernel::new(*frame, output, options.mode)?;
        run_kernel(&mut kernel, options.block_size)?;
    }

    log::debug!(
        "composed {}x{} frame into {}x{} ({})",
        width,
        height,
        dual_width,
        height,
        options.mode
    );

    Ok(DualChannelFrame {
        width: dual_width,
        height,
        dual,
        black_bg,
    })
}

#[cfg(feature = "multithreaded")]
fn run_kernel(kernel: &mut DualChannelKernel<'_>, _block_size: u32) -> Result<(), ComposeError> {
    // Rows are the unit of parallel work, tiling adds nothing here
    kernel.process_block_par(super::types::Block::full(kernel.width(), kernel.height()))
}

#[cfg(not(feature = "multithreaded"))]
fn run_kernel(kernel: &mut DualChannelKernel<'_>, block_size: u32) -> Result<(), ComposeError> {
    kernel.process_tiled(block_size)
}

/// Compose a batch of frames sharing the first frame's dimensions.
///
/// `on_progress` runs after every frame; returning `ControlFlow::Break(())`
/// stops the batch with [`ComposeError::Cancelled`].
///
/// # Errors
///
/// - [`ComposeError::EmptyFrames`] for an empty batch
/// - [`ComposeError::FrameSizeMismatch`] if any frame differs in size from the first
pub fn compose_frames<F>(
    frames: &[SourceFrame<'_>],
    options: &ComposeOptions,
    mut on_progress: F,
) -> Result<Vec<DualChannelFrame>, ComposeError>
where
    F: FnMut(FrameProgress) -> ControlFlow<()>,
{
    let first = frames.first().ok_or(ComposeError::EmptyFrames)?;
    let (width, height) = (first.width(), first.height());

    // Validate the whole batch before doing any work
    for (index, frame) in frames.iter().enumerate() {
        if frame.width() != width || frame.height() != height {
            return Err(ComposeError::FrameSizeMismatch {
                index,
                width,
                height,
                actual_width: frame.width(),
                actual_height: frame.height(),
            });
        }
    }

    let total = frames.len();
    log::debug!("composing batch of {} frames at {}x{}", total, width, height);

    let mut results = Vec::with_capacity(total);
    for frame in frames {
        results.push(compose_frame(frame, options)?);

        let progress = FrameProgress {
            completed: results.len(),
            total,
        };
        if on_progress(progress).is_break() {
            log::warn!("batch cancelled after {} of {} frames", progress.completed, total);
            return Err(ComposeError::Cancelled {
                completed: progress.completed,
                total,
            });
        }
    }

    Ok(results)
}
