//! Builder for raw network output layers, used to feed scripted detectors.

use crate::detection::{BOX_COLUMNS, DetectionOutputLayer};
use crate::error::Result;

/// Builder for `DetectionOutputLayer` rows in network output format.
///
/// Each `row` call starts a new row with all scores at zero; `objectness`
/// and `score` set values on the current row.
#[derive(Debug, Clone)]
pub struct OutputLayerBuilder {
    num_classes: usize,
    values: Vec<f32>,
}

impl OutputLayerBuilder {
    /// Create a builder for a network with `num_classes` classes.
    pub fn new(num_classes: usize) -> Self {
        Self {
            num_classes,
            values: Vec::new(),
        }
    }

    #[inline]
    fn columns(&self) -> usize {
        BOX_COLUMNS + self.num_classes
    }

    #[inline]
    fn current_row_start(&self) -> Option<usize> {
        match self.values.len() {
            0 => None,
            len => Some(len - self.columns()),
        }
    }

    /// Start a row with a normalized center/size box (fractions of the frame).
    pub fn row(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.values.extend_from_slice(&[cx, cy, w, h, 0.0]);
        self.values.extend(std::iter::repeat_n(0.0, self.num_classes));
        self
    }

    /// Set the objectness of the current row.
    pub fn objectness(mut self, objectness: f32) -> Self {
        if let Some(start) = self.current_row_start() {
            self.values[start + 4] = objectness;
        }
        self
    }

    /// Set one class score of the current row. Out-of-range classes are ignored.
    pub fn score(mut self, class_id: usize, score: f32) -> Self {
        if class_id < self.num_classes {
            if let Some(start) = self.current_row_start() {
                self.values[start + BOX_COLUMNS + class_id] = score;
            }
        }
        self
    }

    /// Build the final layer; `index` labels it in errors.
    pub fn build(self, index: usize) -> Result<DetectionOutputLayer> {
        let columns = self.columns();
        DetectionOutputLayer::from_flat(self.values, columns, index)
    }
}
