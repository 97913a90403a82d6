//! Kernel entry points with the orchestrator's calling convention.
//!
//! Coordinates and dimensions arrive as signed 32-bit integers and the
//! layout as an integer flag (nonzero for color on the left). Negative
//! values are rejected before any buffer is touched.
//!
//! # Example
//!
//! ```typescript
//! import { processSinglePixel, processBlock } from '@dualchannel/wasm';
//!
//! const dual = new Uint8Array(width * 2 * height * 4);
//! const blackBg = new Uint8Array(width * 2 * height * 4);
//!
//! // One 128x128 tile
//! processBlock(0, 0, 128, 128, frame, width, width * 2, dual, blackBg, 1);
//!
//! // A single pixel, alpha on the left
//! processSinglePixel(10, 20, frame, width, width * 2, dual, blackBg, 0);
//! ```

use dualchannel_core::{ComposeError, LayoutMode};
use wasm_bindgen::prelude::*;

/// Transform one source pixel into both outputs.
///
/// `dual_data` and `black_bg_data` are written in place.
///
/// # Errors
///
/// Returns an error if:
/// - Any coordinate or dimension is negative
/// - `dual_width` is not twice `width`
/// - A buffer is too small or `(x, y)` lies outside the frame
#[wasm_bindgen(js_name = processSinglePixel)]
#[allow(clippy::too_many_arguments)]
pub fn process_single_pixel(
    x: i32,
    y: i32,
    frame_data: &[u8],
    width: i32,
    dual_width: i32,
    dual_data: &mut [u8],
    black_bg_data: &mut [u8],
    is_color_left_alpha_right: i32,
) -> Result<(), JsValue> {
    single_pixel(
        x,
        y,
        frame_data,
        width,
        dual_width,
        dual_data,
        black_bg_data,
        is_color_left_alpha_right,
    )
    .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Transform every pixel of a rectangle into both outputs.
///
/// Rows are processed top to bottom, columns left to right. An empty
/// rectangle does nothing.
///
/// # Errors
///
/// Same as [`process_single_pixel`], plus a rectangle that leaves the frame.
#[wasm_bindgen(js_name = processBlock)]
#[allow(clippy::too_many_arguments)]
pub fn process_block(
    start_x: i32,
    start_y: i32,
    block_width: i32,
    block_height: i32,
    frame_data: &[u8],
    width: i32,
    dual_width: i32,
    dual_data: &mut [u8],
    black_bg_data: &mut [u8],
    is_color_left_alpha_right: i32,
) -> Result<(), JsValue> {
    block(
        start_x,
        start_y,
        block_width,
        block_height,
        frame_data,
        width,
        dual_width,
        dual_data,
        black_bg_data,
        is_color_left_alpha_right,
    )
    .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[allow(clippy::too_many_arguments)]
fn single_pixel(
    x: i32,
    y: i32,
    frame_data: &[u8],
    width: i32,
    dual_width: i32,
    dual_data: &mut [u8],
    black_bg_data: &mut [u8],
    is_color_left_alpha_right: i32,
) -> Result<(), ComposeError> {
    dualchannel_core::process_single_pixel(
        unsigned("x", x)?,
        unsigned("y", y)?,
        frame_data,
        unsigned("width", width)?,
        unsigned("dualWidth", dual_width)?,
        dual_data,
        black_bg_data,
        LayoutMode::from_flag(is_color_left_alpha_right),
    )
}

#[allow(clippy::too_many_arguments)]
fn block(
    start_x: i32,
    start_y: i32,
    block_width: i32,
    block_height: i32,
    frame_data: &[u8],
    width: i32,
    dual_width: i32,
    dual_data: &mut [u8],
    black_bg_data: &mut [u8],
    is_color_left_alpha_right: i32,
) -> Result<(), ComposeError> {
    dualchannel_core::process_block(
        unsigned("startX", start_x)?,
        unsigned("startY", start_y)?,
        unsigned("blockWidth", block_width)?,
        unsigned("blockHeight", block_height)?,
        frame_data,
        unsigned("width", width)?,
        unsigned("dualWidth", dual_width)?,
        dual_data,
        black_bg_data,
        LayoutMode::from_flag(is_color_left_alpha_right),
    )
}

/// Convert a JS integer argument, rejecting negatives.
fn unsigned(name: &'static str, value: i32) -> Result<u32, ComposeError> {
    u32::try_from(value).map_err(|_| ComposeError::NegativeArgument { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsigned() {
        assert_eq!(unsigned("x", 0), Ok(0));
        assert_eq!(unsigned("x", i32::MAX), Ok(i32::MAX as u32));
        assert_eq!(
            unsigned("width", -1),
            Err(ComposeError::NegativeArgument {
                name: "width",
                value: -1
            })
        );
    }

    #[test]
    fn test_single_pixel_two_pixel_frame() {
        let frame = [200u8, 100, 50, 128, 0, 0, 0, 0];
        let mut dual = vec![0u8; 16];
        let mut black = vec![0u8; 16];

        for x in 0..2 {
            single_pixel(x, 0, &frame, 2, 4, &mut dual, &mut black, 1).unwrap();
        }

        assert_eq!(&dual[0..4], &[255, 199, 99, 128]);
        assert_eq!(&dual[4..8], &[0, 0, 0, 0]);
        assert_eq!(&dual[8..12], &[128, 128, 128, 255]);
        assert_eq!(&dual[12..16], &[0, 0, 0, 255]);
        assert_eq!(&black[0..4], &[128, 100, 50, 255]);
        assert_eq!(&black[4..8], &[0, 0, 0, 255]);
    }

    #[test]
    fn test_flag_zero_puts_alpha_left() {
        let frame = [200u8, 100, 50, 128];
        let mut dual = vec![0u8; 8];
        let mut black = vec![0u8; 8];

        single_pixel(0, 0, &frame, 1, 2, &mut dual, &mut black, 0).unwrap();

        assert_eq!(&dual[0..4], &[128, 128, 128, 255]);
        assert_eq!(&dual[4..8], &[255, 199, 99, 128]);
    }

    #[test]
    fn test_any_nonzero_flag_is_color_left() {
        let frame = [10u8, 20, 30, 255];
        for flag in [1, -1, 42] {
            let mut dual = vec![0u8; 8];
            let mut black = vec![0u8; 8];
            single_pixel(0, 0, &frame, 1, 2, &mut dual, &mut black, flag).unwrap();
            assert_eq!(&dual[0..4], &[10, 20, 30, 255]);
        }
    }

    #[test]
    fn test_negative_coordinate_rejected_without_writes() {
        let frame = [10u8, 20, 30, 255];
        let mut dual = vec![7u8; 8];
        let mut black = vec![7u8; 8];

        let result = single_pixel(-1, 0, &frame, 1, 2, &mut dual, &mut black, 1);

        assert!(matches!(
            result,
            Err(ComposeError::NegativeArgument { name: "x", value: -1 })
        ));
        assert!(dual.iter().chain(black.iter()).all(|&b| b == 7));
    }

    #[test]
    fn test_block_matches_single_pixels() {
        let (width, height) = (5, 3);
        let frame: Vec<u8> = (0..width * height)
            .flat_map(|i| {
                let a = (i * 17 % 256) as u8;
                [a / 2, a / 3, a, a]
            })
            .collect();
        let len = (width * 2 * height * 4) as usize;

        let (mut dual_a, mut black_a) = (vec![0u8; len], vec![0u8; len]);
        block(1, 1, 3, 2, &frame, width, width * 2, &mut dual_a, &mut black_a, 1).unwrap();

        let (mut dual_b, mut black_b) = (vec![0u8; len], vec![0u8; len]);
        for y in 1..3 {
            for x in 1..4 {
                single_pixel(x, y, &frame, width, width * 2, &mut dual_b, &mut black_b, 1).unwrap();
            }
        }

        assert_eq!(dual_a, dual_b);
        assert_eq!(black_a, black_b);
    }

    #[test]
    fn test_block_rejects_bad_geometry() {
        let frame = vec![0u8; 4 * 4 * 4];
        let mut dual = vec![0u8; 8 * 4 * 4];
        let mut black = vec![0u8; 8 * 4 * 4];

        let result = block(0, 0, 4, 4, &frame, 4, 7, &mut dual, &mut black, 1);
        assert!(matches!(result, Err(ComposeError::InvalidGeometry { .. })));

        let result = block(2, 2, 3, 1, &frame, 4, 8, &mut dual, &mut black, 1);
        assert!(matches!(result, Err(ComposeError::BlockOutOfRange { .. })));

        let result = block(0, 0, -4, 4, &frame, 4, 8, &mut dual, &mut black, 1);
        assert!(matches!(
            result,
            Err(ComposeError::NegativeArgument {
                name: "blockWidth",
                ..
            })
        ));
    }
}
