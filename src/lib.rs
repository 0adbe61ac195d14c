//! Idle Breakout autoplayer.
//!
//! Frames come from a [`capture::FrameSource`], bricks are located by
//! [`detection::detect_bricks`] and clicked through an
//! [`input::InputSink`]. [`driver::run`] ties them together.

pub mod capture;
pub mod detection;
pub mod diagnostics;
pub mod driver;
pub mod input;
