mod bricks;
mod buttons;
pub mod types;

pub use bricks::{detect_bricks, detect_bricks_with, threshold_dark, CandidateRegion};
pub use buttons::find_ready_buttons;
pub use types::{ButtonRow, CircularityRange, DetectError, DetectionParams, Target};
