//! Borrowed, bounds-checked views over caller-owned RGBA buffers.
//!
//! The kernel never allocates. Callers hand in slices and the views here
//! own the stride and offset arithmetic so it is validated once, at
//! construction, instead of at every write site.

use super::pixel::ComposedPixel;
use super::types::ComposeError;

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Length in bytes of a `width`x`height` RGBA raster, or `None` on overflow.
pub(crate) fn rgba_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(BYTES_PER_PIXEL)
}

/// Read-only view of a premultiplied RGBA source frame.
#[derive(Debug, Clone, Copy)]
pub struct SourceFrame<'a> {
    pixels: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> SourceFrame<'a> {
    /// Wrap a buffer holding at least `width * height * 4` bytes.
    ///
    /// Trailing bytes past the raster are ignored.
    pub fn new(pixels: &'a [u8], width: u32, height: u32) -> Result<Self, ComposeError> {
        if width == 0 || height == 0 {
            return Err(ComposeError::InvalidDimensions { width, height });
        }
        let expected = rgba_len(width, height).ok_or(ComposeError::InvalidDimensions { width, height })?;
        if pixels.len() < expected {
            return Err(ComposeError::BufferTooSmall {
                buffer: "frame",
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels: &pixels[..expected],
            width,
            height,
        })
    }

    /// Wrap a buffer of known width, deriving the height from its length.
    pub fn with_width(pixels: &'a [u8], width: u32) -> Result<Self, ComposeError> {
        let height = rows_in(pixels.len(), width);
        Self::new(pixels, width, height)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raster bytes (exactly `width * height * 4`).
    pub fn pixels(&self) -> &'a [u8] {
        self.pixels
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// One row of the frame.
    #[inline]
    pub(crate) fn row(&self, y: u32) -> &'a [u8] {
        let start = y as usize * self.stride();
        &self.pixels[start..start + self.stride()]
    }
}

/// Mutable views of the dual-channel and black-background rasters.
///
/// Both share one geometry: `dual_width` columns split into a left half
/// `[0, dual_width / 2)` and a right half `[dual_width / 2, dual_width)`.
#[derive(Debug)]
pub struct DualChannelBuffers<'a> {
    dual: &'a mut [u8],
    black_bg: &'a mut [u8],
    dual_width: u32,
    height: u32,
}

impl<'a> DualChannelBuffers<'a> {
    /// Wrap two buffers holding at least `dual_width * height * 4` bytes each.
    pub fn new(
        dual: &'a mut [u8],
        black_bg: &'a mut [u8],
        dual_width: u32,
        height: u32,
    ) -> Result<Self, ComposeError> {
        if dual_width == 0 || height == 0 {
            return Err(ComposeError::InvalidDimensions {
                width: dual_width,
                height,
            });
        }
        let expected = rgba_len(dual_width, height).ok_or(ComposeError::InvalidDimensions {
            width: dual_width,
            height,
        })?;
        if dual.len() < expected {
            return Err(ComposeError::BufferTooSmall {
                buffer: "dual-channel",
                expected,
                actual: dual.len(),
            });
        }
        if black_bg.len() < expected {
            return Err(ComposeError::BufferTooSmall {
                buffer: "black-background",
                expected,
                actual: black_bg.len(),
            });
        }
        Ok(Self {
            dual: &mut dual[..expected],
            black_bg: &mut black_bg[..expected],
            dual_width,
            height,
        })
    }

    /// Wrap two buffers of known width, deriving the height from the shorter one.
    pub fn with_width(
        dual: &'a mut [u8],
        black_bg: &'a mut [u8],
        dual_width: u32,
    ) -> Result<Self, ComposeError> {
        let height = rows_in(dual.len().min(black_bg.len()), dual_width);
        Self::new(dual, black_bg, dual_width, height)
    }

    #[inline]
    pub fn dual_width(&self) -> u32 {
        self.dual_width
    }

    /// Columns per half; the right half starts here.
    #[inline]
    pub fn half_width(&self) -> u32 {
        self.dual_width / 2
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.dual_width as usize * BYTES_PER_PIXEL
    }

    /// Mutable access to both rasters for row `y`.
    #[inline]
    pub(crate) fn row_mut(&mut self, y: u32) -> DualRowMut<'_> {
        let stride = self.stride();
        let start = y as usize * stride;
        let half_width = self.half_width() as usize;
        DualRowMut::new(
            &mut self.dual[start..start + stride],
            &mut self.black_bg[start..start + stride],
            half_width,
        )
    }

    /// Rows `[y_start, y_end)` of both rasters as disjoint slices.
    #[cfg(feature = "multithreaded")]
    pub(crate) fn rows_mut(&mut self, y_start: u32, y_end: u32) -> (&mut [u8], &mut [u8]) {
        let stride = self.stride();
        let range = y_start as usize * stride..y_end as usize * stride;
        (&mut self.dual[range.clone()], &mut self.black_bg[range])
    }

    /// The dual-channel raster.
    pub fn dual(&self) -> &[u8] {
        self.dual
    }

    /// The black-background raster.
    pub fn black_bg(&self) -> &[u8] {
        self.black_bg
    }
}

/// One output row of both rasters.
pub(crate) struct DualRowMut<'r> {
    dual: &'r mut [u8],
    black_bg: &'r mut [u8],
    half_width: usize,
}

impl<'r> DualRowMut<'r> {
    pub(crate) fn new(dual: &'r mut [u8], black_bg: &'r mut [u8], half_width: usize) -> Self {
        Self {
            dual,
            black_bg,
            half_width,
        }
    }

    /// Write every output of source column `x`.
    #[inline]
    pub(crate) fn store(&mut self, x: usize, px: &ComposedPixel) {
        let left = x * BYTES_PER_PIXEL;
        let right = (x + self.half_width) * BYTES_PER_PIXEL;

        self.dual[left..left + BYTES_PER_PIXEL].copy_from_slice(&px.dual_left);
        self.dual[right..right + BYTES_PER_PIXEL].copy_from_slice(&px.dual_right);
        self.black_bg[left..left + BYTES_PER_PIXEL].copy_from_slice(&px.black_left);
        self.black_bg[right..right + BYTES_PER_PIXEL].copy_from_slice(&px.black_right);
    }
}

#[inline]
pub(crate) fn read_pixel(row: &[u8], x: usize) -> [u8; 4] {
    let i = x * BYTES_PER_PIXEL;
    [row[i], row[i + 1], row[i + 2], row[i + 3]]
}

fn rows_in(len: usize, width: u32) -> u32 {
    match (width as usize).checked_mul(BYTES_PER_PIXEL) {
        Some(stride) if stride > 0 => (len / stride).min(u32::MAX as usize) as u32,
        _ => 0,
    }
}
