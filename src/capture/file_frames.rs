use super::{CaptureError, FrameSource};
use anyhow::{Context, Result};
use image::RgbImage;
use std::fs;
use std::path::Path;

/// Frames preloaded from a directory and replayed in a loop.
///
/// Files are read once, in file name order. Anything that does not decode
/// as an image is skipped.
pub struct FileFrames {
    frames: Vec<RgbImage>,
    next_index: usize,
}

impl FileFrames {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, CaptureError> {
        let dir = dir.as_ref();
        tracing::info!("Loading frames from {}", dir.display());

        if !dir.exists() {
            return Err(CaptureError::NotFound(dir.to_path_buf()));
        }
        if !dir.is_dir() {
            return Err(CaptureError::NotADirectory(dir.to_path_buf()));
        }

        let io_error = |source| CaptureError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut frames = Vec::with_capacity(paths.len());
        for path in &paths {
            match image::open(path) {
                Ok(image) => {
                    tracing::debug!(
                        "Loaded {} ({}x{})",
                        path.display(),
                        image.width(),
                        image.height()
                    );
                    frames.push(image.to_rgb8());
                }
                Err(err) => tracing::warn!("Skipping {}: {}", path.display(), err),
            }
        }

        if frames.is_empty() {
            return Err(CaptureError::NoImages(dir.to_path_buf()));
        }

        tracing::info!("Loaded {} frames", frames.len());

        Ok(Self::from_frames(frames))
    }

    /// Replay an in-memory sequence
    pub fn from_frames(frames: Vec<RgbImage>) -> Self {
        Self {
            frames,
            next_index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for FileFrames {
    fn take_frame(&mut self) -> Result<RgbImage> {
        if self.next_index >= self.frames.len() {
            self.next_index = 0;
        }
        let frame = self
            .frames
            .get(self.next_index)
            .cloned()
            .context("frame source holds no frames")?;
        self.next_index += 1;
        Ok(frame)
    }
}
