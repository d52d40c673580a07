//! Conversion of a frame into the network input blob.

use ndarray::Array4;

use crate::frame::Frame;

/// Resize `frame` to `width x height` with bilinear sampling, scale to
/// `[0, 1]` and reorder BGR to RGB planes.
///
/// The result has NCHW shape `[1, 3, height, width]`. The whole frame is
/// stretched; nothing is cropped. Single-channel frames are replicated into
/// all three planes.
pub fn blob_from_frame(frame: &Frame, width: u32, height: u32) -> Array4<f32> {
    let (out_w, out_h) = (width as usize, height as usize);
    let mut blob = Array4::zeros((1, 3, out_h, out_w));
    if frame.is_empty() || out_w == 0 || out_h == 0 {
        return blob;
    }

    let pixels = frame.pixels();
    let (src_h, src_w, channels) = pixels.dim();
    let scale_x = src_w as f32 / out_w as f32;
    let scale_y = src_h as f32 / out_h as f32;

    // BGR input: plane 0 (R) reads channel 2, plane 2 (B) reads channel 0.
    let source_channel = |plane: usize| if channels >= 3 { 2 - plane } else { 0 };

    for y in 0..out_h {
        let fy = ((y as f32 + 0.5) * scale_y - 0.5).max(0.0);
        let y0 = (fy as usize).min(src_h - 1);
        let y1 = (y0 + 1).min(src_h - 1);
        let wy = fy - y0 as f32;

        for x in 0..out_w {
            let fx = ((x as f32 + 0.5) * scale_x - 0.5).max(0.0);
            let x0 = (fx as usize).min(src_w - 1);
            let x1 = (x0 + 1).min(src_w - 1);
            let wx = fx - x0 as f32;

            for plane in 0..3 {
                let c = source_channel(plane);
                let p00 = pixels[[y0, x0, c]] as f32;
                let p01 = pixels[[y0, x1, c]] as f32;
                let p10 = pixels[[y1, x0, c]] as f32;
                let p11 = pixels[[y1, x1, c]] as f32;

                let top = p00 + (p01 - p00) * wx;
                let bottom = p10 + (p11 - p10) * wx;
                blob[[0, plane, y, x]] = (top + (bottom - top) * wy) / 255.0;
            }
        }
    }

    blob
}
