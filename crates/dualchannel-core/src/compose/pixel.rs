//! Per-pixel dual-channel transform.
//!
//! A premultiplied RGBA source pixel produces four output pixels: the color
//! half and the alpha-as-gray half of the dual-channel raster, and each of
//! those flattened onto black.
//!
//! # Rounding
//!
//! Un-premultiplying truncates toward zero while the black-background blend
//! rounds to nearest. Downstream alpha recovery depends on these exact values.

use super::types::LayoutMode;

/// Recover straight color from a premultiplied RGBA pixel.
///
/// - `a == 0`: black
/// - `a == 255`: color unchanged
/// - otherwise `min(255, c * 255 / a)` per channel, truncated
#[inline]
pub fn unpremultiply([r, g, b, a]: [u8; 4]) -> [u8; 3] {
    match a {
        0 => [0, 0, 0],
        255 => [r, g, b],
        _ => {
            let factor = 255.0f32 / a as f32;
            [
                (r as f32 * factor).min(255.0) as u8,
                (g as f32 * factor).min(255.0) as u8,
                (b as f32 * factor).min(255.0) as u8,
            ]
        }
    }
}

/// Alpha replicated into R, G and B, fully opaque.
#[inline]
pub fn alpha_as_gray(a: u8) -> [u8; 4] {
    [a, a, a, 255]
}

/// Flatten a straight-alpha pixel onto an opaque black backdrop.
///
/// The result is always fully opaque.
#[inline]
pub fn blend_on_black([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    match a {
        255 => [r, g, b, 255],
        0 => [0, 0, 0, 255],
        _ => {
            let factor = a as f32 / 255.0;
            [
                (r as f32 * factor).round() as u8,
                (g as f32 * factor).round() as u8,
                (b as f32 * factor).round() as u8,
                255,
            ]
        }
    }
}

/// The four output pixels produced by one source pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposedPixel {
    /// Dual-channel raster, left half.
    pub dual_left: [u8; 4],
    /// Dual-channel raster, right half.
    pub dual_right: [u8; 4],
    /// Black-background composite, left half.
    pub black_left: [u8; 4],
    /// Black-background composite, right half.
    pub black_right: [u8; 4],
}

impl ComposedPixel {
    /// Run the full transform for one premultiplied source pixel.
    pub fn compose(src: [u8; 4], mode: LayoutMode) -> Self {
        let a = src[3];
        let [r, g, b] = unpremultiply(src);
        let color = [r, g, b, a];
        let gray = alpha_as_gray(a);

        let (dual_left, dual_right) = if mode.is_color_left() {
            (color, gray)
        } else {
            (gray, color)
        };

        // Each half blends with the alpha written into its own dual pixel
        Self {
            dual_left,
            dual_right,
            black_left: blend_on_black(dual_left),
            black_right: blend_on_black(dual_right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpremultiply_opaque_is_identity() {
        for c in 0..=255u8 {
            assert_eq!(unpremultiply([c, 255 - c, c / 2, 255]), [c, 255 - c, c / 2]);
        }
    }

    #[test]
    fn test_unpremultiply_transparent_is_black() {
        assert_eq!(unpremultiply([200, 100, 50, 0]), [0, 0, 0]);
        assert_eq!(unpremultiply([255, 255, 255, 0]), [0, 0, 0]);
    }

    #[test]
    fn test_unpremultiply_truncates() {
        // 100 * 255 / 128 = 199.2, 50 * 255 / 128 = 99.6
        assert_eq!(unpremultiply([200, 100, 50, 128]), [255, 199, 99]);
    }

    #[test]
    fn test_unpremultiply_clamps_invalid_premultiplied() {
        // Channel larger than alpha is not valid premultiplied data
        assert_eq!(unpremultiply([255, 255, 255, 1]), [255, 255, 255]);
    }

    #[test]
    fn test_blend_on_black_boundaries() {
        assert_eq!(blend_on_black([10, 20, 30, 255]), [10, 20, 30, 255]);
        assert_eq!(blend_on_black([10, 20, 30, 0]), [0, 0, 0, 255]);
    }

    #[test]
    fn test_blend_on_black_rounds() {
        // 199 * 128 / 255 = 99.89, 99 * 128 / 255 = 49.69
        assert_eq!(blend_on_black([255, 199, 99, 128]), [128, 100, 50, 255]);
        // 1 * 128 / 255 = 0.502
        assert_eq!(blend_on_black([1, 1, 1, 128]), [1, 1, 1, 255]);
        // 1 * 127 / 255 = 0.498
        assert_eq!(blend_on_black([1, 1, 1, 127]), [0, 0, 0, 255]);
    }

    #[test]
    fn test_alpha_as_gray() {
        assert_eq!(alpha_as_gray(0), [0, 0, 0, 255]);
        assert_eq!(alpha_as_gray(77), [77, 77, 77, 255]);
    }

    #[test]
    fn test_compose_color_left() {
        let px = ComposedPixel::compose([200, 100, 50, 128], LayoutMode::ColorLeftAlphaRight);
        assert_eq!(px.dual_left, [255, 199, 99, 128]);
        assert_eq!(px.dual_right, [128, 128, 128, 255]);
        assert_eq!(px.black_left, [128, 100, 50, 255]);
        assert_eq!(px.black_right, [128, 128, 128, 255]);
    }

    #[test]
    fn test_compose_alpha_left() {
        let px = ComposedPixel::compose([200, 100, 50, 128], LayoutMode::AlphaLeftColorRight);
        assert_eq!(px.dual_left, [128, 128, 128, 255]);
        assert_eq!(px.dual_right, [255, 199, 99, 128]);
        assert_eq!(px.black_left, [128, 128, 128, 255]);
        assert_eq!(px.black_right, [128, 100, 50, 255]);
    }

    #[test]
    fn test_compose_transparent_pixel() {
        let px = ComposedPixel::compose([0, 0, 0, 0], LayoutMode::ColorLeftAlphaRight);
        assert_eq!(px.dual_left, [0, 0, 0, 0]);
        assert_eq!(px.black_left, [0, 0, 0, 255]);
        assert_eq!(px.dual_right, [0, 0, 0, 255]);
        assert_eq!(px.black_right, [0, 0, 0, 255]);
    }

    #[test]
    fn test_color_and_gray_halves() {
        let src = [30, 60, 90, 200];

        let px = ComposedPixel::compose(src, LayoutMode::ColorLeftAlphaRight);
        assert_eq!(px.dual_right, [200, 200, 200, 255]);
        assert_eq!(px.dual_left[3], 200);

        let px = ComposedPixel::compose(src, LayoutMode::AlphaLeftColorRight);
        assert_eq!(px.dual_left, [200, 200, 200, 255]);
        assert_eq!(px.dual_right[3], 200);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
