//! Pixel and block processing over caller-owned buffers.
//!
//! Geometry is validated once when a [`DualChannelKernel`] is built and
//! once per call for the requested pixel or block. The inner loops then run
//! without further checks beyond slice indexing.
//!
//! Every source pixel writes only its own left and right columns, so
//! disjoint blocks (and rows) can be processed in any order or in parallel.

use super::pixel::ComposedPixel;
use super::types::{split_into_blocks, Block, ComposeError, LayoutMode};
use super::view::{read_pixel, DualChannelBuffers, DualRowMut, SourceFrame};
use std::ops::Range;

#[cfg(feature = "multithreaded")]
use rayon::prelude::*;

/// The dual-channel transform bound to one source frame and its outputs.
#[derive(Debug)]
pub struct DualChannelKernel<'a> {
    frame: SourceFrame<'a>,
    output: DualChannelBuffers<'a>,
    mode: LayoutMode,
    height: u32,
}

impl<'a> DualChannelKernel<'a> {
    /// Bind a frame to its outputs.
    ///
    /// # Errors
    ///
    /// [`ComposeError::InvalidGeometry`] unless the outputs are exactly twice
    /// as wide as the frame. Only rows present in both the frame and the
    /// outputs are addressable.
    pub fn new(
        frame: SourceFrame<'a>,
        output: DualChannelBuffers<'a>,
        mode: LayoutMode,
    ) -> Result<Self, ComposeError> {
        check_geometry(frame.width(), output.dual_width())?;
        let height = frame.height().min(output.height());
        Ok(Self {
            frame,
            output,
            mode,
            height,
        })
    }

    /// Bind raw buffers, deriving row counts from their lengths.
    pub fn from_raw(
        frame_data: &'a [u8],
        width: u32,
        dual_width: u32,
        dual_data: &'a mut [u8],
        black_bg_data: &'a mut [u8],
        mode: LayoutMode,
    ) -> Result<Self, ComposeError> {
        check_geometry(width, dual_width)?;
        let frame = SourceFrame::with_width(frame_data, width)?;
        let output = DualChannelBuffers::with_width(dual_data, black_bg_data, dual_width)?;
        Self::new(frame, output, mode)
    }

    /// Source frame width.
    pub fn width(&self) -> u32 {
        self.frame.width()
    }

    /// Addressable rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    /// The outputs written so far.
    pub fn output(&self) -> &DualChannelBuffers<'a> {
        &self.output
    }

    /// Transform the source pixel at `(x, y)`.
    pub fn process_pixel(&mut self, x: u32, y: u32) -> Result<(), ComposeError> {
        if x >= self.width() || y >= self.height {
            return Err(ComposeError::IndexOutOfRange {
                x,
                y,
                width: self.width(),
                height: self.height,
            });
        }
        self.process_span(y, x as usize..x as usize + 1);
        Ok(())
    }

    /// Transform every pixel of `block`, rows outer, columns inner.
    ///
    /// An empty block is a no-op.
    pub fn process_block(&mut self, block: Block) -> Result<(), ComposeError> {
        self.check_block(block)?;
        if block.is_empty() {
            return Ok(());
        }

        log::trace!("processing block {} ({} px)", block, block.pixel_count());
        let columns = block.x as usize..(block.x + block.width) as usize;
        for y in block.y..block.y + block.height {
            self.process_span(y, columns.clone());
        }
        Ok(())
    }

    /// Transform the whole frame in row-major `block_size` tiles.
    ///
    /// A `block_size` of zero processes the frame as a single tile.
    pub fn process_tiled(&mut self, block_size: u32) -> Result<(), ComposeError> {
        for block in split_into_blocks(self.width(), self.height, block_size) {
            self.process_block(block)?;
        }
        Ok(())
    }

    /// Transform every pixel of `block`, rows spread across the rayon pool.
    ///
    /// Produces exactly the same output as [`process_block`](Self::process_block).
    #[cfg(feature = "multithreaded")]
    pub fn process_block_par(&mut self, block: Block) -> Result<(), ComposeError> {
        self.check_block(block)?;
        if block.is_empty() {
            return Ok(());
        }

        log::trace!("processing block {} ({} px) in parallel", block, block.pixel_count());
        let frame = self.frame;
        let mode = self.mode;
        let stride = self.output.stride();
        let half_width = self.output.half_width() as usize;
        let columns = block.x as usize..(block.x + block.width) as usize;
        let (dual, black_bg) = self.output.rows_mut(block.y, block.y + block.height);

        dual.par_chunks_exact_mut(stride)
            .zip(black_bg.par_chunks_exact_mut(stride))
            .enumerate()
            .for_each(|(i, (dual_row, black_row))| {
                let src_row = frame.row(block.y + i as u32);
                let mut out = DualRowMut::new(dual_row, black_row, half_width);
                compose_span(src_row, &mut out, columns.clone(), mode);
            });
        Ok(())
    }

    fn check_block(&self, block: Block) -> Result<(), ComposeError> {
        if block.fits_within(self.width(), self.height) {
            Ok(())
        } else {
            Err(ComposeError::BlockOutOfRange {
                block,
                width: self.width(),
                height: self.height,
            })
        }
    }

    fn process_span(&mut self, y: u32, columns: Range<usize>) {
        let src_row = self.frame.row(y);
        let mode = self.mode;
        let mut out = self.output.row_mut(y);
        compose_span(src_row, &mut out, columns, mode);
    }
}

fn compose_span(src_row: &[u8], out: &mut DualRowMut<'_>, columns: Range<usize>, mode: LayoutMode) {
    for x in columns {
        let px = ComposedPixel::compose(read_pixel(src_row, x), mode);
        out.store(x, &px);
    }
}

fn check_geometry(width: u32, dual_width: u32) -> Result<(), ComposeError> {
    if width.checked_mul(2) == Some(dual_width) {
        Ok(())
    } else {
        Err(ComposeError::InvalidGeometry { width, dual_width })
    }
}

/// Transform a single source pixel into the dual-channel and black-background buffers.
///
/// Buffers are RGBA8888, row-major. Row counts are derived from buffer
/// lengths, so pooled buffers larger than the raster are accepted.
///
/// # Errors
///
/// - [`ComposeError::InvalidGeometry`] if `dual_width != 2 * width`
/// - [`ComposeError::InvalidDimensions`] / [`ComposeError::BufferTooSmall`] for unusable buffers
/// - [`ComposeError::IndexOutOfRange`] if `(x, y)` lies outside the frame
#[allow(clippy::too_many_arguments)]
pub fn process_single_pixel(
    x: u32,
    y: u32,
    frame_data: &[u8],
    width: u32,
    dual_width: u32,
    dual_data: &mut [u8],
    black_bg_data: &mut [u8],
    mode: LayoutMode,
) -> Result<(), ComposeError> {
    DualChannelKernel::from_raw(frame_data, width, dual_width, dual_data, black_bg_data, mode)?
        .process_pixel(x, y)
}

/// Transform every pixel of a rectangle, rows outer, columns inner.
///
/// Same buffer conventions and errors as [`process_single_pixel`], with
/// [`ComposeError::BlockOutOfRange`] when the rectangle leaves the frame.
#[allow(clippy::too_many_arguments)]
pub fn process_block(
    start_x: u32,
    start_y: u32,
    block_width: u32,
    block_height: u32,
    frame_data: &[u8],
    width: u32,
    dual_width: u32,
    dual_data: &mut [u8],
    black_bg_data: &mut [u8],
    mode: LayoutMode,
) -> Result<(), ComposeError> {
    DualChannelKernel::from_raw(frame_data, width, dual_width, dual_data, black_bg_data, mode)?
        .process_block(Block::new(start_x, start_y, block_width, block_height))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
