//! Integration module for connecting inference backends, frame sources and
//! renderers with the detect/track cycle.
//!
//! This module provides the collaborator traits and a pipeline that drives a
//! whole stream through the [`CycleController`](crate::cycle::CycleController).

mod builder;
mod detector;
mod pipeline;

pub use builder::OutputLayerBuilder;
pub use detector::{Detector, FrameSource, Renderer};
pub use pipeline::{RunSummary, TrackingPipeline, WarningKind};

#[cfg(feature = "burn-backend")]
mod burn_backend;

#[cfg(feature = "burn-backend")]
pub use burn_backend::{BurnDetector, BurnDetectorError, BurnModel};
