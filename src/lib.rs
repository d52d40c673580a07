//! Detect-then-track controller for following a single ball through a video
//! stream.
//!
//! A neural detector runs on one frame out of every `cycle_length`; its raw
//! output is reduced to a single target box (confidence filter,
//! class-agnostic NMS, target-class selection) which seeds a lightweight
//! visual tracker for the remaining frames of the cycle.

pub mod classes;
pub mod config;
pub mod cycle;
pub mod detection;
pub mod error;
pub mod frame;
pub mod integration;
pub mod tracker;

pub use classes::ClassNames;
pub use config::{Config, CycleConfig, DetectorConfig, SelectionPolicy};
pub use cycle::{CycleController, CycleState, FrameReport, FrameWarning, Phase, TargetBox};
pub use detection::{Detection, DetectionOutputLayer, DetectionReducer};
pub use error::{Error, Result};
pub use frame::Frame;
pub use integration::{
    Detector, FrameSource, OutputLayerBuilder, Renderer, RunSummary, TrackingPipeline,
    WarningKind,
};
pub use tracker::{PixelBox, Rect, TemplateTracker, TemplateTrackerConfig, Tracker};
