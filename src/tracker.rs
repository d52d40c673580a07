mod handoff;
mod kalman_filter;
mod rect;
mod template;

pub use handoff::{TrackerHandoff, to_tracker_box};
pub use kalman_filter::{KalmanFilter, MotionState};
pub use rect::{PixelBox, Rect};
pub use template::{TemplateTracker, TemplateTrackerConfig};

use crate::frame::Frame;

/// A stateful single-object visual tracker.
///
/// Implementations own a hidden appearance/motion model. `init` (re)seeds it
/// from a frame and a box; `update` advances it by one frame. The caller
/// guarantees `update` is only issued after a successful `init`.
pub trait Tracker {
    /// Seed the internal model. Returns `false` if the tracker cannot start
    /// from this box (for example, the box falls outside the frame).
    fn init(&mut self, frame: &Frame, bbox: Rect) -> bool;

    /// Advance one frame. `None` signals lost or low-confidence tracking; the
    /// returned box is only meaningful when `Some`.
    fn update(&mut self, frame: &Frame) -> Option<Rect>;
}

impl<T: Tracker + ?Sized> Tracker for Box<T> {
    fn init(&mut self, frame: &Frame, bbox: Rect) -> bool {
        (**self).init(frame, bbox)
    }

    fn update(&mut self, frame: &Frame) -> Option<Rect> {
        (**self).update(frame)
    }
}
