//! Frame-by-frame driver of the detect/track cycle.

use crate::config::{CycleConfig, DetectorConfig};
use crate::cycle::state::{CycleEvent, CycleState, Phase};
use crate::detection::{Detection, DetectionReducer};
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::integration::Detector;
use crate::tracker::{Rect, Tracker, TrackerHandoff, to_tracker_box};

/// The single active target box.
///
/// Only one representation is authoritative at a time: the detector's
/// integer box on the DETECT frame that produced it, the tracker's
/// real-valued box on TRACK frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetBox {
    Detected(Detection),
    Tracked(Rect),
}

impl TargetBox {
    /// The box in tracker coordinates, whichever form is active.
    pub fn rect(&self) -> Rect {
        match self {
            TargetBox::Detected(det) => to_tracker_box(det),
            TargetBox::Tracked(rect) => *rect,
        }
    }
}

/// Recoverable per-frame conditions. Each is logged once when it occurs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameWarning {
    /// No target-class box survived reduction; detection is retried on the
    /// next frame.
    NoTargetDetected,
    /// The tracker refused the detected box; the next frame detects again.
    TrackerReinitFailed(Detection),
    /// The tracker lost the target on this frame. The cycle keeps counting.
    TrackerUpdateFailed,
}

/// Result of processing one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Zero-based index of the frame in the stream.
    pub index: u64,
    /// Phase this frame was processed in.
    pub phase: Phase,
    /// Box to render, if any.
    pub target: Option<TargetBox>,
    pub warning: Option<FrameWarning>,
}

/// Owns the cycle state, the reducer and the tracker, and decides per frame
/// whether to detect or to track.
pub struct CycleController<T: Tracker> {
    config: CycleConfig,
    reducer: DetectionReducer,
    handoff: TrackerHandoff<T>,
    state: CycleState,
    target: Option<TargetBox>,
    frame_index: u64,
}

impl<T: Tracker> CycleController<T> {
    pub fn new(detector_config: DetectorConfig, config: CycleConfig, tracker: T) -> Result<Self> {
        detector_config.validate()?;
        config.validate()?;

        log::info!(
            "cycle controller: cycle_length = {}, target class = {}, conf = {}, nms = {}",
            config.cycle_length,
            detector_config.target_class_id,
            detector_config.conf_threshold,
            detector_config.nms_threshold,
        );

        Ok(Self {
            config,
            reducer: DetectionReducer::new(detector_config),
            handoff: TrackerHandoff::new(tracker),
            state: CycleState::INITIAL,
            target: None,
            frame_index: 0,
        })
    }

    #[inline]
    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Target box from the most recent frame.
    #[inline]
    pub fn target(&self) -> Option<TargetBox> {
        self.target
    }

    #[inline]
    pub fn reducer(&self) -> &DetectionReducer {
        &self.reducer
    }

    #[inline]
    pub fn handoff(&self) -> &TrackerHandoff<T> {
        &self.handoff
    }

    /// Process one frame. `detector` is only invoked on DETECT frames.
    ///
    /// Inference failure is returned as an error and leaves the cycle state
    /// untouched.
    pub fn process<D: Detector>(&mut self, detector: &mut D, frame: &Frame) -> Result<FrameReport> {
        let phase = self.state.phase;
        let (event, target, warning) = match phase {
            Phase::Detect => self.detect(detector, frame)?,
            Phase::Track => self.track(frame),
        };

        if let Some(warning) = &warning {
            log::warn!("frame {}: {warning:?}", self.frame_index);
        }

        let report = FrameReport {
            index: self.frame_index,
            phase,
            target,
            warning,
        };

        self.state = self.state.next(event, self.config.cycle_length);
        self.target = target;
        self.frame_index += 1;

        Ok(report)
    }

    fn detect<D: Detector>(
        &mut self,
        detector: &mut D,
        frame: &Frame,
    ) -> Result<(CycleEvent, Option<TargetBox>, Option<FrameWarning>)> {
        let layers = detector
            .infer(frame)
            .map_err(|e| Error::Inference(Box::new(e)))?;
        let detection = self.reducer.reduce(&layers, frame.width(), frame.height());

        let Some(detection) = detection else {
            self.handoff.invalidate();
            return Ok((CycleEvent::NoTarget, None, Some(FrameWarning::NoTargetDetected)));
        };

        log::debug!(
            "frame {}: detected class {} ({:.2}) at {:?}",
            self.frame_index,
            detection.class_id,
            detection.confidence,
            detection.bbox
        );

        if self.handoff.reinit(frame, to_tracker_box(&detection)) {
            Ok((CycleEvent::Seeded, Some(TargetBox::Detected(detection)), None))
        } else {
            Ok((
                CycleEvent::ReinitFailed,
                None,
                Some(FrameWarning::TrackerReinitFailed(detection)),
            ))
        }
    }

    fn track(&mut self, frame: &Frame) -> (CycleEvent, Option<TargetBox>, Option<FrameWarning>) {
        match self.handoff.update(frame) {
            Some(rect) => (CycleEvent::Tracked, Some(TargetBox::Tracked(rect)), None),
            None => (
                CycleEvent::TrackFailed,
                None,
                Some(FrameWarning::TrackerUpdateFailed),
            ),
        }
    }
}
