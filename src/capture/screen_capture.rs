use super::FrameSource;
use anyhow::{Context, Result};
use image::{DynamicImage, RgbImage};
use xcap::Monitor;

/// Live screenshots of one monitor
pub struct ScreenCapture {
    monitor: Monitor,
}

impl ScreenCapture {
    /// Capture the primary monitor, or the first one if none is flagged primary
    pub fn primary() -> Result<Self> {
        let monitors = Monitor::all().context("Failed to enumerate monitors")?;
        tracing::debug!("Found {} monitors", monitors.len());

        let mut fallback = None;
        let mut primary = None;
        for monitor in monitors {
            if monitor.is_primary().unwrap_or(false) {
                primary = Some(monitor);
                break;
            }
            if fallback.is_none() {
                fallback = Some(monitor);
            }
        }
        let monitor = primary.or(fallback).context("no monitors found")?;

        tracing::info!(
            "Capturing monitor {} at {}x{}",
            monitor.name().unwrap_or_else(|_| "<unnamed>".to_string()),
            monitor.width().unwrap_or(0),
            monitor.height().unwrap_or(0)
        );

        Ok(Self { monitor })
    }
}

impl FrameSource for ScreenCapture {
    fn take_frame(&mut self) -> Result<RgbImage> {
        let screenshot = self
            .monitor
            .capture_image()
            .context("Failed to capture screen")?;

        Ok(DynamicImage::ImageRgba8(screenshot).to_rgb8())
    }
}
