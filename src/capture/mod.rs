mod file_frames;
#[cfg(feature = "screen")]
mod screen_capture;

pub use file_frames::FileFrames;
#[cfg(feature = "screen")]
pub use screen_capture::ScreenCapture;

use anyhow::Result;
use image::RgbImage;
use std::path::PathBuf;
use thiserror::Error;

/// Trait for frame sources
pub trait FrameSource {
    /// Take the next frame
    fn take_frame(&mut self) -> Result<RgbImage>;
}

/// Where frames come from, decided once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameSourceKind {
    /// Replay the images of a directory in a loop
    FileBacked(PathBuf),
    /// Capture the primary monitor on every call
    LiveScreen,
}

/// Setup failures of frame sources
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("frames directory {0} does not exist")]
    NotFound(PathBuf),

    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("frames directory {0} does not contain any readable images")]
    NoImages(PathBuf),

    #[error("failed to read frames directory {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Create the frame source described by `kind`
pub fn create_frame_source(kind: &FrameSourceKind) -> Result<Box<dyn FrameSource>> {
    match kind {
        FrameSourceKind::FileBacked(dir) => Ok(Box::new(FileFrames::open(dir)?)),
        #[cfg(feature = "screen")]
        FrameSourceKind::LiveScreen => Ok(Box::new(ScreenCapture::primary()?)),
        #[cfg(not(feature = "screen"))]
        FrameSourceKind::LiveScreen => {
            anyhow::bail!(
                "built without screen capture, rebuild with `--features screen` or pass --frames-dir"
            )
        }
    }
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn take_frame(&mut self) -> Result<RgbImage> {
        (**self).take_frame()
    }
}
