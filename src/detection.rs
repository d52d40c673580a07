//! Detection side of the cycle: network input preparation and reduction of
//! raw network output to one target box.

mod blob;
mod nms;
mod output;
mod reducer;

pub use blob::blob_from_frame;
pub use nms::non_maximum_suppression;
pub use output::{BOX_COLUMNS, DetectionOutputLayer, OutputRow};
pub use reducer::{Detection, DetectionReducer};
