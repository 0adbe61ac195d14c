use super::{Stage, StageObserver};
use anyhow::{Context, Result};
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};

/// Persists every stage image as a timestamped PNG file
pub struct DumpObserver {
    dir: PathBuf,
}

impl DumpObserver {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create dump directory {}", dir.display()))?;

        tracing::info!("Dumping stage images to {}", dir.display());

        Ok(Self { dir })
    }

    /// `<ordinal>_<stage>_<unix millis>.png`
    fn file_path(&self, stage: Stage) -> PathBuf {
        let timestamp = chrono::Utc::now().timestamp_millis();
        self.dir.join(format!(
            "{}_{}_{}.png",
            stage.ordinal(),
            stage.name(),
            timestamp
        ))
    }
}

impl StageObserver for DumpObserver {
    fn observe(&mut self, stage: Stage, image: &DynamicImage) {
        let path = self.file_path(stage);
        match image.save(&path) {
            Ok(()) => tracing::debug!("Dumped {}", path.display()),
            Err(err) => tracing::warn!("Failed to dump {}: {}", path.display(), err),
        }
    }
}
