//! Owned video frame.

use ndarray::{Array2, Array3, ArrayView3, Axis};

/// A decoded frame stored as `height x width x channels` bytes.
///
/// Three-channel frames are expected in BGR order, as capture devices
/// deliver them. Single-channel frames are treated as grayscale.
#[derive(Debug, Clone)]
pub struct Frame {
    pixels: Array3<u8>,
}

impl Frame {
    pub fn new(pixels: Array3<u8>) -> Self {
        Self { pixels }
    }

    /// Frame of the given size filled with one gray level.
    pub fn filled(width: u32, height: u32, channels: usize, value: u8) -> Self {
        Self {
            pixels: Array3::from_elem((height as usize, width as usize, channels), value),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.len_of(Axis(1)) as u32
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.len_of(Axis(0)) as u32
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.pixels.len_of(Axis(2))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn pixels(&self) -> ArrayView3<'_, u8> {
        self.pixels.view()
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut Array3<u8> {
        &mut self.pixels
    }

    /// Luminance plane as `f32` in `[0, 255]`, shape `height x width`.
    pub fn luma(&self) -> Array2<f32> {
        let (h, w, c) = self.pixels.dim();
        if c == 0 {
            return Array2::zeros((h, w));
        }
        if c < 3 {
            return self.pixels.index_axis(Axis(2), 0).mapv(f32::from);
        }

        let mut out = Array2::zeros((h, w));
        for ((y, x), v) in out.indexed_iter_mut() {
            let b = self.pixels[[y, x, 0]] as f32;
            let g = self.pixels[[y, x, 1]] as f32;
            let r = self.pixels[[y, x, 2]] as f32;
            *v = 0.114 * b + 0.587 * g + 0.299 * r;
        }
        out
    }
}

impl From<Array3<u8>> for Frame {
    fn from(pixels: Array3<u8>) -> Self {
        Self::new(pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let frame = Frame::filled(640, 480, 3, 0);
        assert_eq!(frame.width(), 640);
        assert_eq!(frame.height(), 480);
        assert_eq!(frame.channels(), 3);
    }

    #[test]
    fn test_luma_of_gray_is_identity() {
        let frame = Frame::filled(4, 2, 3, 200);
        let luma = frame.luma();
        assert_eq!(luma.dim(), (2, 4));
        assert!(luma.iter().all(|&v| (v - 200.0).abs() < 1e-3));
    }

    #[test]
    fn test_luma_without_channels_is_black() {
        let frame = Frame::filled(5, 4, 0, 0);
        let luma = frame.luma();
        assert_eq!(luma.dim(), (4, 5));
        assert!(luma.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_luma_single_channel() {
        let frame = Frame::filled(3, 3, 1, 17);
        assert!(frame.luma().iter().all(|&v| v == 17.0));
    }
}
