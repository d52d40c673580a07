mod controller;
mod state;

pub use controller::{CycleController, FrameReport, FrameWarning, TargetBox};
pub use state::{CycleEvent, CycleState, Phase};
