use super::{Stage, StageObserver};
use anyhow::{Context, Result};
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Live view of the pipeline.
///
/// Each stage overwrites a fixed file (`<ordinal>_<stage>.png`), so an
/// image viewer that reloads on change shows the latest frame. After the
/// final stage the observer pauses for `delay` to give the viewer time to
/// catch up.
pub struct PreviewObserver {
    dir: PathBuf,
    delay: Duration,
}

impl PreviewObserver {
    pub fn new<P: AsRef<Path>>(dir: P, delay: Duration) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create preview directory {}", dir.display()))?;

        tracing::info!("Previewing stage images in {}", dir.display());

        Ok(Self { dir, delay })
    }

    fn file_path(&self, stage: Stage) -> PathBuf {
        self.dir.join(format!("{}_{}.png", stage.ordinal(), stage.name()))
    }
}

impl StageObserver for PreviewObserver {
    fn observe(&mut self, stage: Stage, image: &DynamicImage) {
        let path = self.file_path(stage);
        tracing::info!(
            "{}. {}, {}x{}",
            stage.ordinal(),
            stage.name(),
            image.width(),
            image.height()
        );

        if let Err(err) = image.save(&path) {
            tracing::warn!("Failed to write preview {}: {}", path.display(), err);
        }

        if stage.is_last() && !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }
}
