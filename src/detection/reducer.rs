//! Reduction of raw network output to the single target detection.

use crate::config::{DetectorConfig, SelectionPolicy};
use crate::detection::DetectionOutputLayer;
use crate::detection::nms::non_maximum_suppression;
use crate::tracker::PixelBox;

/// A scored, classified box in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub class_id: usize,
    pub confidence: f32,
    pub bbox: PixelBox,
}

/// Confidence filter, class-agnostic NMS and target-class selection.
#[derive(Debug, Clone)]
pub struct DetectionReducer {
    config: DetectorConfig,
}

impl DetectionReducer {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Rows whose best class score is strictly above `conf_threshold`,
    /// converted to frame pixels. Objectness is not consulted. Order follows
    /// the layers and their rows.
    pub fn candidates(
        &self,
        layers: &[DetectionOutputLayer],
        frame_width: u32,
        frame_height: u32,
    ) -> Vec<Detection> {
        let mut detections = Vec::new();

        for layer in layers {
            for row in layer.rows() {
                let Some((class_id, confidence)) = row.best_class() else {
                    continue;
                };

                // also drops NaN scores
                if !(confidence > self.config.conf_threshold) {
                    continue;
                }

                detections.push(Detection {
                    class_id,
                    confidence,
                    bbox: PixelBox::from_normalized_xywh(
                        row.cx,
                        row.cy,
                        row.w,
                        row.h,
                        frame_width,
                        frame_height,
                    ),
                });
            }
        }

        detections
    }

    /// Candidates surviving class-agnostic NMS, most confident first.
    pub fn survivors(
        &self,
        layers: &[DetectionOutputLayer],
        frame_width: u32,
        frame_height: u32,
    ) -> Vec<Detection> {
        let candidates = self.candidates(layers, frame_width, frame_height);
        let boxes: Vec<PixelBox> = candidates.iter().map(|d| d.bbox).collect();
        let scores: Vec<f32> = candidates.iter().map(|d| d.confidence).collect();

        non_maximum_suppression(&boxes, &scores, self.config.nms_threshold as f64)
            .into_iter()
            .map(|idx| candidates[idx])
            .collect()
    }

    /// Pick the target-class detection out of NMS survivors according to the
    /// configured [`SelectionPolicy`].
    pub fn select(&self, survivors: &[Detection]) -> Option<Detection> {
        let mut matches = survivors
            .iter()
            .filter(|d| d.class_id == self.config.target_class_id);

        match self.config.selection {
            SelectionPolicy::PreferLastIterated => matches.last().copied(),
            SelectionPolicy::PreferHighestConfidence => matches.next().copied(),
        }
    }

    /// Full reduction: `None` if no box of the target class survives.
    pub fn reduce(
        &self,
        layers: &[DetectionOutputLayer],
        frame_width: u32,
        frame_height: u32,
    ) -> Option<Detection> {
        let survivors = self.survivors(layers, frame_width, frame_height);
        self.select(&survivors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::OutputLayerBuilder;

    const BALL: usize = 32;

    fn reducer(selection: SelectionPolicy) -> DetectionReducer {
        DetectionReducer::new(DetectorConfig {
            selection,
            ..Default::default()
        })
    }

    #[test]
    fn test_candidates_pixel_conversion() {
        let layer = OutputLayerBuilder::new(80)
            .row(0.5, 0.5, 0.1, 0.2)
            .objectness(0.9)
            .score(BALL, 0.8)
            .build(0)
            .unwrap();

        let dets = reducer(SelectionPolicy::default()).candidates(&[layer], 640, 480);
        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].class_id, BALL);
        assert_eq!(dets[0].bbox, PixelBox::new(288, 192, 64, 96));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let layer = OutputLayerBuilder::new(80)
            .row(0.5, 0.5, 0.1, 0.1)
            .objectness(0.9)
            .score(BALL, 0.5)
            .build(0)
            .unwrap();

        let dets = reducer(SelectionPolicy::default()).candidates(&[layer], 100, 100);
        assert!(dets.is_empty());
    }

    #[test]
    fn test_low_objectness_row_survives() {
        let layer = OutputLayerBuilder::new(80)
            .row(0.5, 0.5, 0.1, 0.1)
            .objectness(0.3)
            .score(BALL, 0.9)
            .build(0)
            .unwrap();

        let target = reducer(SelectionPolicy::default())
            .reduce(&[layer], 100, 100)
            .unwrap();
        assert_eq!(target.confidence, 0.9);
        assert_eq!(target.bbox, PixelBox::new(45, 45, 10, 10));
    }

    #[test]
    fn test_suppression_is_class_agnostic() {
        // a person box and a ball box at the same place: the more confident
        // person suppresses the ball
        let layer = OutputLayerBuilder::new(80)
            .row(0.5, 0.5, 0.2, 0.2)
            .objectness(0.95)
            .score(0, 0.95)
            .row(0.5, 0.5, 0.2, 0.2)
            .objectness(0.9)
            .score(BALL, 0.9)
            .build(0)
            .unwrap();

        let r = reducer(SelectionPolicy::default());
        assert_eq!(r.survivors(std::slice::from_ref(&layer), 200, 200).len(), 1);
        assert_eq!(r.reduce(&[layer], 200, 200), None);
    }

    #[test]
    fn test_selection_policies() {
        // two well separated balls: 0.9 on the left, 0.7 on the right
        let layers = [
            OutputLayerBuilder::new(80)
                .row(0.2, 0.5, 0.1, 0.1)
                .objectness(0.9)
                .score(BALL, 0.9)
                .build(0)
                .unwrap(),
            OutputLayerBuilder::new(80)
                .row(0.8, 0.5, 0.1, 0.1)
                .objectness(0.9)
                .score(BALL, 0.7)
                .build(1)
                .unwrap(),
        ];

        let last = reducer(SelectionPolicy::PreferLastIterated)
            .reduce(&layers, 100, 100)
            .unwrap();
        assert_eq!(last.confidence, 0.7);

        let best = reducer(SelectionPolicy::PreferHighestConfidence)
            .reduce(&layers, 100, 100)
            .unwrap();
        assert_eq!(best.confidence, 0.9);
    }

    #[test]
    fn test_out_of_range_coordinates_do_not_panic() {
        let layer = OutputLayerBuilder::new(80)
            .row(-1.0e9, 0.5, 0.1, 0.1)
            .objectness(0.9)
            .score(BALL, 0.95)
            .row(1.0e9, 1.0e9, 1.0e9, 1.0e9)
            .objectness(0.9)
            .score(BALL, 0.8)
            .build(0)
            .unwrap();

        let target = reducer(SelectionPolicy::PreferHighestConfidence)
            .reduce(&[layer], 640, 480)
            .unwrap();
        assert_eq!(target.bbox.left, i32::MIN);
    }

    #[test]
    fn test_no_layers() {
        assert_eq!(reducer(SelectionPolicy::default()).reduce(&[], 640, 480), None);
    }
}
