//! Handoff of the detected target from the detector to the tracker.

use crate::detection::Detection;
use crate::frame::Frame;
use crate::tracker::{Rect, Tracker};

/// Widen a detection's integer box into the tracker's coordinate space.
#[inline]
pub fn to_tracker_box(detection: &Detection) -> Rect {
    detection.bbox.to_rect()
}

/// Single owner of the tracker instance.
///
/// Tracks whether the tracker currently holds a valid seed, and refuses to
/// forward `update` calls until it does.
pub struct TrackerHandoff<T: Tracker> {
    tracker: T,
    initialized: bool,
}

impl<T: Tracker> TrackerHandoff<T> {
    pub fn new(tracker: T) -> Self {
        Self {
            tracker,
            initialized: false,
        }
    }

    /// Reseed the tracker with `bbox` on `frame`.
    ///
    /// On failure the handoff is left uninitialised and later `update` calls
    /// return `None` without reaching the tracker.
    pub fn reinit(&mut self, frame: &Frame, bbox: Rect) -> bool {
        self.initialized = self.tracker.init(frame, bbox);
        log::debug!("tracker init with {bbox:?}: ok = {}", self.initialized);
        self.initialized
    }

    pub fn update(&mut self, frame: &Frame) -> Option<Rect> {
        if !self.initialized {
            return None;
        }
        self.tracker.update(frame)
    }

    /// Drop the current seed, e.g. after the target was lost at a DETECT frame.
    pub fn invalidate(&mut self) {
        self.initialized = false;
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[inline]
    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    #[inline]
    pub fn tracker_mut(&mut self) -> &mut T {
        &mut self.tracker
    }

    pub fn into_inner(self) -> T {
        self.tracker
    }
}
