//! Frame-level composition and encoding bindings.
//!
//! These wrap the core frame helpers for a worker that receives whole
//! captured frames rather than driving the kernel tile by tile.
//!
//! # Options
//!
//! Every function takes an optional options object; missing fields take
//! their defaults.
//!
//! ```typescript
//! const options = { mode: 'alpha-left-color-right', format: 'jpeg', quality: 80 };
//! const frame = composeFrame(pixels, width, height, options);
//! const jpeg = encodeComposite(frame, options);
//! ```

use crate::types::JsDualChannelFrame;
use dualchannel_core::{encode, ComposeError, ComposeOptions, FrameProgress, SourceFrame};
use js_sys::{Array, Function, Uint8Array};
use std::ops::ControlFlow;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Compose one premultiplied RGBA frame.
///
/// `pixels` may be longer than `width * height * 4`; trailing bytes are ignored.
#[wasm_bindgen(js_name = composeFrame)]
pub fn compose_frame(
    pixels: &[u8],
    width: u32,
    height: u32,
    options: JsValue,
) -> Result<JsDualChannelFrame, JsValue> {
    let options = parse_options(options)?;
    let frame = SourceFrame::new(pixels, width, height).map_err(|e| JsValue::from_str(&e.to_string()))?;
    dualchannel_core::compose_frame(&frame, &options)
        .map(JsDualChannelFrame::from_core)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode the black-background composite of a frame.
///
/// JPEG by default, with quality picked from the output size unless given.
#[wasm_bindgen(js_name = encodeComposite)]
pub fn encode_composite(frame: &JsDualChannelFrame, options: JsValue) -> Result<Vec<u8>, JsValue> {
    let options = parse_options(options)?;
    encode::encode_composite(frame.inner(), &options).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Compose and encode a batch of frames.
///
/// `frames` is an array of `Uint8Array`, all `width`x`height`. Frames are
/// composed and encoded one at a time, so only one composite is held in
/// memory. After each frame is encoded `on_progress(completed, total)` is
/// called; returning `false` cancels the batch. Resolves to an array of
/// encoded composites.
///
/// # Errors
///
/// Returns an error if:
/// - An element of `frames` is not a `Uint8Array` or is too small
/// - The batch is empty
/// - The callback throws or cancels
#[wasm_bindgen(js_name = composeFrames)]
pub fn compose_frames(
    frames: Array,
    width: u32,
    height: u32,
    options: JsValue,
    on_progress: Option<Function>,
) -> Result<Array, JsValue> {
    let options = parse_options(options)?;
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or_else(|| JsValue::from_str(&ComposeError::InvalidDimensions { width, height }.to_string()))?;

    // Check every element before any work; pixels are copied in per frame
    let arrays = frames
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let array = value
                .dyn_into::<Uint8Array>()
                .map_err(|_| JsValue::from_str(&format!("Frame {} is not a Uint8Array", index)))?;
            if (array.length() as usize) < expected {
                let err = ComposeError::BufferTooSmall {
                    buffer: "frame",
                    expected,
                    actual: array.length() as usize,
                };
                return Err(JsValue::from_str(&format!("Frame {}: {}", index, err)));
            }
            Ok(array)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut callback_error = None;
    let result = compose_and_encode(
        arrays.iter().map(Uint8Array::to_vec),
        width,
        height,
        &options,
        |progress, _encoded| {
            let Some(callback) = &on_progress else {
                return ControlFlow::Continue(());
            };
            match callback.call2(
                &JsValue::NULL,
                &JsValue::from(progress.completed as u32),
                &JsValue::from(progress.total as u32),
            ) {
                Ok(value) if value.as_bool() == Some(false) => ControlFlow::Break(()),
                Ok(_) => ControlFlow::Continue(()),
                Err(err) => {
                    callback_error = Some(err);
                    ControlFlow::Break(())
                }
            }
        },
    );

    if let Some(err) = callback_error {
        return Err(err);
    }

    let encoded = result.map_err(|e| JsValue::from_str(&e))?;
    Ok(encoded
        .iter()
        .map(|bytes| JsValue::from(Uint8Array::from(bytes.as_slice())))
        .collect())
}

/// MIME type of the composites produced with these options.
#[wasm_bindgen(js_name = compositeMimeType)]
pub fn composite_mime_type(options: JsValue) -> Result<String, JsValue> {
    Ok(parse_options(options)?.format.mime_type().to_string())
}

/// Parse an options object; `undefined` and `null` give the defaults.
fn parse_options(options: JsValue) -> Result<ComposeOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(ComposeOptions::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&format!("Invalid compose options: {}", e)))
}

/// Compose and encode frames one at a time.
///
/// Each composite is dropped once encoded. `on_progress` runs after each
/// frame with that frame's encoded bytes; `ControlFlow::Break(())` cancels.
fn compose_and_encode<I, F>(
    frames: I,
    width: u32,
    height: u32,
    options: &ComposeOptions,
    mut on_progress: F,
) -> Result<Vec<Vec<u8>>, String>
where
    I: ExactSizeIterator<Item = Vec<u8>>,
    F: FnMut(FrameProgress, &[u8]) -> ControlFlow<()>,
{
    let total = frames.len();
    if total == 0 {
        return Err(ComposeError::EmptyFrames.to_string());
    }
    log::debug!("composing and encoding {} frames at {}x{}", total, width, height);

    let mut encoded = Vec::with_capacity(total);
    for pixels in frames {
        let source = SourceFrame::new(&pixels, width, height).map_err(|e| e.to_string())?;
        let composed = dualchannel_core::compose_frame(&source, options).map_err(|e| e.to_string())?;
        let bytes = encode::encode_composite(&composed, options).map_err(|e| e.to_string())?;
        drop(composed);

        let progress = FrameProgress {
            completed: encoded.len() + 1,
            total,
        };
        let flow = on_progress(progress, &bytes);
        encoded.push(bytes);

        if flow.is_break() {
            log::warn!("batch cancelled after {} of {} frames", progress.completed, total);
            return Err(ComposeError::Cancelled {
                completed: progress.completed,
                total,
            }
            .to_string());
        }
    }

    Ok(encoded)
}
