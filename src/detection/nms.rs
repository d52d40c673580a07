//! Greedy, class-agnostic non-maximum suppression.

use std::cmp::Ordering;

use crate::tracker::PixelBox;

/// Indices of the boxes kept by greedy NMS, best score first.
///
/// Boxes are visited in descending score order (ties keep input order). A box
/// is kept unless its IoU with an already kept box exceeds `iou_threshold`.
pub fn non_maximum_suppression(
    boxes: &[PixelBox],
    scores: &[f32],
    iou_threshold: f64,
) -> Vec<usize> {
    debug_assert_eq!(boxes.len(), scores.len());

    let mut order: Vec<usize> = (0..boxes.len().min(scores.len())).collect();
    order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));

    let mut keep: Vec<usize> = Vec::with_capacity(order.len());
    for idx in order {
        let suppressed = keep
            .iter()
            .any(|&kept| boxes[kept].iou(&boxes[idx]) > iou_threshold);
        if !suppressed {
            keep.push(idx);
        }
    }

    keep
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vec<PixelBox>, Vec<f32>) {
        let boxes = vec![
            PixelBox::new(0, 0, 10, 10),
            PixelBox::new(1, 1, 10, 10),
            PixelBox::new(50, 50, 10, 10),
            PixelBox::new(52, 50, 10, 10),
            PixelBox::new(100, 0, 20, 20),
            PixelBox::new(2, 0, 10, 10),
        ];
        let scores = vec![0.7, 0.9, 0.6, 0.65, 0.55, 0.8];
        (boxes, scores)
    }

    #[test]
    fn test_keeps_best_per_cluster() {
        let (boxes, scores) = sample();
        let keep = non_maximum_suppression(&boxes, &scores, 0.4);
        assert_eq!(keep, vec![1, 3, 4]);
    }

    #[test]
    fn test_overlapping_pair_keeps_higher_confidence() {
        // 20x10 boxes shifted by 5px horizontally: IoU = 150 / 250 = 0.6
        let boxes = vec![PixelBox::new(0, 0, 10, 10), PixelBox::new(0, 0, 10, 10)];
        let shifted = [PixelBox::new(0, 0, 20, 10), PixelBox::new(5, 0, 20, 10)];
        assert!((shifted[0].iou(&shifted[1]) - 0.6).abs() < 1e-9);

        let keep = non_maximum_suppression(&shifted, &[0.6, 0.9], 0.4);
        assert_eq!(keep, vec![1]);

        // identical boxes collapse to the first of equal scores
        let keep = non_maximum_suppression(&boxes, &[0.5, 0.5], 0.4);
        assert_eq!(keep, vec![0]);
    }

    #[test]
    fn test_idempotent() {
        let (boxes, scores) = sample();
        for threshold in [0.0, 0.2, 0.4, 0.7, 1.0] {
            let keep = non_maximum_suppression(&boxes, &scores, threshold);
            let kept_boxes: Vec<_> = keep.iter().map(|&i| boxes[i]).collect();
            let kept_scores: Vec<_> = keep.iter().map(|&i| scores[i]).collect();
            let again = non_maximum_suppression(&kept_boxes, &kept_scores, threshold);
            assert_eq!(again, (0..keep.len()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_empty() {
        assert!(non_maximum_suppression(&[], &[], 0.4).is_empty());
    }
}
