//! Template-matching tracker with a constant-velocity motion prior.
//!
//! `init` cuts a luminance template out of the seed box. Each `update`
//! predicts where the box center moved with the Kalman filter, then searches
//! a window of `search_margin` pixels around that prediction for the offset
//! with the lowest mean absolute difference against the template.

use ndarray::{Array2, ArrayView2, s};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::tracker::kalman_filter::{KalmanFilter, MotionState};
use crate::tracker::{Rect, Tracker};

/// Smallest template side, in pixels.
const MIN_TEMPLATE_SIDE: usize = 2;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplateTrackerConfig {
    /// Half-size of the search window around the predicted position.
    pub search_margin: u32,
    /// Matches worse than this mean absolute luminance difference are
    /// reported as tracking failures.
    pub max_mean_abs_diff: f32,
}

impl Default for TemplateTrackerConfig {
    fn default() -> Self {
        Self {
            search_margin: 24,
            max_mean_abs_diff: 40.0,
        }
    }
}

impl TemplateTrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.max_mean_abs_diff.is_finite() && self.max_mean_abs_diff >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "max_mean_abs_diff must be a non-negative number, got {}",
                self.max_mean_abs_diff
            )));
        }
        Ok(())
    }
}

struct Seed {
    template: Array2<f32>,
    motion: MotionState,
}

pub struct TemplateTracker {
    config: TemplateTrackerConfig,
    kalman_filter: KalmanFilter,
    seed: Option<Seed>,
}

impl TemplateTracker {
    pub fn new(config: TemplateTrackerConfig) -> Self {
        Self {
            config,
            kalman_filter: KalmanFilter::default(),
            seed: None,
        }
    }

    /// Template size as `(width, height)`, if seeded.
    pub fn template_size(&self) -> Option<(usize, usize)> {
        self.seed.as_ref().map(|s| {
            let (h, w) = s.template.dim();
            (w, h)
        })
    }

    /// Best top-left position and its mean absolute difference.
    fn search(
        &self,
        luma: ArrayView2<'_, f32>,
        template: &Array2<f32>,
        predicted_center: (f64, f64),
    ) -> Option<((usize, usize), f32)> {
        let (fh, fw) = luma.dim();
        let (th, tw) = template.dim();
        if th > fh || tw > fw {
            return None;
        }

        let max_x = (fw - tw) as i64;
        let max_y = (fh - th) as i64;
        let px = (predicted_center.0 - tw as f64 / 2.0).round() as i64;
        let py = (predicted_center.1 - th as f64 / 2.0).round() as i64;
        let margin = self.config.search_margin as i64;

        let x0 = (px - margin).clamp(0, max_x);
        let x1 = (px + margin).clamp(0, max_x);
        let y0 = (py - margin).clamp(0, max_y);
        let y1 = (py + margin).clamp(0, max_y);

        let area = (th * tw) as f32;
        let mut best: Option<((usize, usize), f32)> = None;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let (x, y) = (x as usize, y as usize);
                let window = luma.slice(s![y..y + th, x..x + tw]);
                let sad = window
                    .iter()
                    .zip(template.iter())
                    .map(|(a, b)| (a - b).abs())
                    .sum::<f32>();
                let mad = sad / area;

                if best.is_none_or(|(_, b)| mad < b) {
                    best = Some(((x, y), mad));
                }
            }
        }

        best
    }
}

impl Default for TemplateTracker {
    fn default() -> Self {
        Self::new(TemplateTrackerConfig::default())
    }
}

impl Tracker for TemplateTracker {
    fn init(&mut self, frame: &Frame, bbox: Rect) -> bool {
        self.seed = None;

        if frame.channels() == 0 || !bbox.is_inside(frame.width(), frame.height()) {
            return false;
        }

        let x = bbox.x.round() as usize;
        let y = bbox.y.round() as usize;
        let w = bbox.width.round() as usize;
        let h = bbox.height.round() as usize;
        if w < MIN_TEMPLATE_SIDE || h < MIN_TEMPLATE_SIDE {
            return false;
        }

        let luma = frame.luma();
        let (fh, fw) = luma.dim();
        if x + w > fw || y + h > fh {
            return false;
        }

        let template = luma.slice(s![y..y + h, x..x + w]).to_owned();
        let center = (x as f64 + w as f64 / 2.0, y as f64 + h as f64 / 2.0);
        let motion = self.kalman_filter.initiate(center, h as f64);

        self.seed = Some(Seed { template, motion });
        true
    }

    fn update(&mut self, frame: &Frame) -> Option<Rect> {
        let seed = self.seed.as_ref()?;
        let (th, tw) = seed.template.dim();
        let scale = th as f64;

        let predicted = self.kalman_filter.predict(&seed.motion, scale);
        let luma = frame.luma();
        let ((x, y), mad) = self.search(luma.view(), &seed.template, predicted.center())?;

        if mad > self.config.max_mean_abs_diff {
            log::debug!("template match too weak: mean abs diff {mad:.1}");
            if let Some(seed) = self.seed.as_mut() {
                seed.motion = predicted;
            }
            return None;
        }

        let measured = (x as f64 + tw as f64 / 2.0, y as f64 + th as f64 / 2.0);
        let corrected = self
            .kalman_filter
            .update(&predicted, measured, scale)
            .unwrap_or(predicted);
        let (cx, cy) = corrected.center();

        if let Some(seed) = self.seed.as_mut() {
            seed.motion = corrected;
        }

        Some(Rect::new(
            cx - tw as f64 / 2.0,
            cy - th as f64 / 2.0,
            tw as f64,
            th as f64,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Dark frame with a bright `size x size` square at `(x, y)`.
    fn frame_with_square(x: usize, y: usize, size: usize) -> Frame {
        let mut frame = Frame::filled(120, 90, 3, 10);
        frame
            .pixels_mut()
            .slice_mut(s![y..y + size, x..x + size, ..])
            .fill(230);
        frame
    }

    #[test]
    fn test_follows_moving_square() {
        let mut tracker = TemplateTracker::default();
        assert!(tracker.init(
            &frame_with_square(20, 30, 10),
            Rect::new(18.0, 28.0, 14.0, 14.0)
        ));
        assert_eq!(tracker.template_size(), Some((14, 14)));

        for step in 1..=8 {
            let x = 20 + step * 3;
            let y = 30 + step;
            let bbox = tracker.update(&frame_with_square(x, y, 10)).unwrap();
            let (cx, cy) = bbox.center();
            assert!((cx - (x as f64 + 5.0)).abs() <= 2.0, "step {step}: cx = {cx}");
            assert!((cy - (y as f64 + 5.0)).abs() <= 2.0, "step {step}: cy = {cy}");
        }
    }

    #[test]
    fn test_reports_failure_when_target_vanishes() {
        let mut tracker = TemplateTracker::default();
        assert!(tracker.init(
            &frame_with_square(40, 40, 12),
            Rect::new(40.0, 40.0, 12.0, 12.0)
        ));

        let blank = Frame::filled(120, 90, 3, 10);
        assert_eq!(tracker.update(&blank), None);
    }

    #[test]
    fn test_rejects_box_outside_frame() {
        let mut tracker = TemplateTracker::default();
        let frame = Frame::filled(50, 50, 3, 0);
        assert!(!tracker.init(&frame, Rect::new(45.0, 45.0, 10.0, 10.0)));
        assert!(!tracker.init(&frame, Rect::new(-1.0, 0.0, 10.0, 10.0)));
        assert!(!tracker.init(&frame, Rect::new(5.0, 5.0, 1.0, 1.0)));
        assert_eq!(tracker.update(&frame), None);
    }

    #[test]
    fn test_rejects_frame_without_channels() {
        let mut tracker = TemplateTracker::default();
        let frame = Frame::filled(64, 64, 0, 0);
        assert!(!tracker.init(&frame, Rect::new(10.0, 10.0, 8.0, 8.0)));
        assert_eq!(tracker.update(&frame), None);
    }

    #[test]
    fn test_rejects_negative_threshold() {
        let config = TemplateTrackerConfig {
            max_mean_abs_diff: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
