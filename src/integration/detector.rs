//! Collaborator traits consumed by the detect/track cycle.

use crate::detection::DetectionOutputLayer;
use crate::frame::Frame;
use crate::tracker::Rect;

/// Trait for object detection inference backends.
///
/// Implement this trait to connect any detection network to the cycle
/// controller. `infer` is blocking and returns the raw output layers; all
/// thresholding and suppression happens in
/// [`DetectionReducer`](crate::detection::DetectionReducer).
///
/// # Example
///
/// ```ignore
/// use balltrack_rs::{Detector, DetectionOutputLayer, Frame};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl Detector for MyDetector {
///     type Error = std::io::Error;
///
///     fn infer(&mut self, frame: &Frame) -> Result<Vec<DetectionOutputLayer>, Self::Error> {
///         // Run inference and return the output layers
///         Ok(vec![])
///     }
/// }
/// ```
pub trait Detector {
    /// Error type for inference failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run the network on one frame.
    fn infer(&mut self, frame: &Frame) -> Result<Vec<DetectionOutputLayer>, Self::Error>;
}

/// Source of decoded frames.
pub trait FrameSource {
    /// Error type for open/read failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Next frame, or `Ok(None)` once the stream is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error>;
}

/// Sink for annotated frames. Fire-and-forget.
pub trait Renderer {
    /// Present `frame` with `bbox` drawn on it. `label` is set on frames where
    /// the box comes from a detection.
    fn draw(&mut self, frame: &Frame, bbox: Rect, label: Option<&str>);

    /// Present a frame that carries no box this time.
    fn draw_plain(&mut self, _frame: &Frame) {}
}

impl<D: Detector + ?Sized> Detector for Box<D> {
    type Error = D::Error;

    fn infer(&mut self, frame: &Frame) -> Result<Vec<DetectionOutputLayer>, Self::Error> {
        (**self).infer(frame)
    }
}
