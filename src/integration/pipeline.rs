//! TrackingPipeline for combining detection with tracking over a stream.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::classes::ClassNames;
use crate::config::Config;
use crate::cycle::{CycleController, FrameReport, FrameWarning, Phase, TargetBox};
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::tracker::{TemplateTracker, Tracker};

use super::{Detector, FrameSource, Renderer};

/// Kinds of [`FrameWarning`], for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    NoTargetDetected,
    TrackerReinitFailed,
    TrackerUpdateFailed,
}

impl From<&FrameWarning> for WarningKind {
    fn from(warning: &FrameWarning) -> Self {
        match warning {
            FrameWarning::NoTargetDetected => WarningKind::NoTargetDetected,
            FrameWarning::TrackerReinitFailed(_) => WarningKind::TrackerReinitFailed,
            FrameWarning::TrackerUpdateFailed => WarningKind::TrackerUpdateFailed,
        }
    }
}

/// Totals for one [`TrackingPipeline::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub detect_frames: u64,
    /// True if the run ended on the stop flag rather than end of stream.
    pub stopped: bool,
    pub warnings: HashMap<WarningKind, u64>,
}

impl RunSummary {
    pub fn warnings_of(&self, kind: WarningKind) -> u64 {
        self.warnings.get(&kind).copied().unwrap_or(0)
    }

    fn record(&mut self, report: &FrameReport) {
        self.frames += 1;
        if report.phase == Phase::Detect {
            self.detect_frames += 1;
        }
        if let Some(warning) = &report.warning {
            *self.warnings.entry(warning.into()).or_default() += 1;
        }
    }
}

/// A detector, a tracker and the cycle controller bundled for end-to-end
/// processing of a frame stream.
pub struct TrackingPipeline<D: Detector, T: Tracker> {
    detector: D,
    controller: CycleController<T>,
    class_names: ClassNames,
}

impl<D: Detector, T: Tracker> TrackingPipeline<D, T> {
    pub fn new(detector: D, tracker: T, config: &Config) -> Result<Self> {
        let controller =
            CycleController::new(config.detector.clone(), config.cycle.clone(), tracker)?;
        Ok(Self {
            detector,
            controller,
            class_names: ClassNames::default(),
        })
    }

    /// Use `names` for detection labels.
    pub fn with_class_names(mut self, names: ClassNames) -> Self {
        self.class_names = names;
        self
    }

    /// Run one frame through the cycle.
    pub fn process_frame(&mut self, frame: &Frame) -> Result<FrameReport> {
        self.controller.process(&mut self.detector, frame)
    }

    /// Annotation text for a report's target, if it carries a detection.
    pub fn label(&self, report: &FrameReport) -> Option<String> {
        match report.target {
            Some(TargetBox::Detected(det)) => {
                Some(self.class_names.label(det.class_id, det.confidence))
            }
            _ => None,
        }
    }

    /// Drain `source`, rendering each frame, until the stream ends or `stop`
    /// is raised.
    ///
    /// `stop` is checked before every frame; raising it discards any
    /// not-yet-processed frame. Frame source and inference errors end the run.
    pub fn run<S, R>(
        &mut self,
        source: &mut S,
        renderer: &mut R,
        stop: &AtomicBool,
    ) -> Result<RunSummary>
    where
        S: FrameSource,
        R: Renderer,
    {
        let mut summary = RunSummary::default();
        log::info!("tracking run started");

        loop {
            if stop.load(Ordering::Relaxed) {
                log::info!("stop requested after {} frames", summary.frames);
                summary.stopped = true;
                break;
            }

            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    log::info!("end of stream after {} frames", summary.frames);
                    break;
                }
                Err(e) => {
                    log::error!("frame source failed: {e}");
                    return Err(Error::InputUnavailable(Box::new(e)));
                }
            };

            let report = self.process_frame(&frame)?;
            summary.record(&report);

            match report.target {
                Some(target) => {
                    let label = self.label(&report);
                    renderer.draw(&frame, target.rect(), label.as_deref());
                }
                None => renderer.draw_plain(&frame),
            }
        }

        log::info!(
            "tracking run finished: {} frames, {} detect frames",
            summary.frames,
            summary.detect_frames
        );
        Ok(summary)
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a reference to the cycle controller.
    pub fn controller(&self) -> &CycleController<T> {
        &self.controller
    }
}

impl<D: Detector> TrackingPipeline<D, TemplateTracker> {
    /// Pipeline using the built-in [`TemplateTracker`].
    pub fn with_template_tracker(detector: D, config: &Config) -> Result<Self> {
        let tracker = TemplateTracker::new(config.tracker.clone());
        Self::new(detector, tracker, config)
    }
}
