use crate::capture::FrameSource;
use crate::detection::{detect_bricks_with, find_ready_buttons, ButtonRow, DetectionParams};
use crate::diagnostics::StageObserver;
use crate::input::{click_at, InputSink};
use anyhow::{Context, Result};
use std::time::Duration;

/// Settings of the automation loop
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Maximum number of frames to process
    pub frames_limit: u32,
    pub detection: DetectionParams,
    pub buttons: ButtonRow,
    /// Only detect and log, never touch the pointer
    pub detect_only: bool,
    /// Pause before the first frame, to bring the game window to the front
    pub start_delay: Duration,
    /// Pause between frames, lets the game settle after a click
    pub iteration_delay: Duration,
    /// Pointer travel time towards a ready button
    pub button_move: Duration,
    /// Pointer travel time towards a brick
    pub target_move: Duration,
}

impl DriverConfig {
    pub fn new(frames_limit: u32, detection: DetectionParams, buttons: ButtonRow) -> Self {
        Self {
            frames_limit,
            detection,
            buttons,
            detect_only: false,
            start_delay: Duration::from_secs(3),
            iteration_delay: Duration::from_millis(250),
            button_move: Duration::from_secs(2),
            target_move: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every requested frame was processed
    FramesLimit,
    /// A frame without bricks ended the run
    NoTargets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u32,
    pub clicks: u32,
    pub stop_reason: StopReason,
}

/// Run the automation loop until the frame limit is reached or, when
/// clicking, until a frame shows no bricks.
///
/// Each frame: click the first ready button if any, then click the first
/// detected brick. In detect-only mode the input sink is never used.
pub fn run<S, I>(
    source: &mut S,
    input: &mut I,
    config: &DriverConfig,
    mut observer: Option<&mut dyn StageObserver>,
) -> Result<RunSummary>
where
    S: FrameSource + ?Sized,
    I: InputSink + ?Sized,
{
    tracing::info!(
        "Starting main loop: frames_limit={}, detect_only={}",
        config.frames_limit,
        config.detect_only
    );

    if !config.start_delay.is_zero() {
        tracing::info!("Waiting {:?} before the first frame", config.start_delay);
        std::thread::sleep(config.start_delay);
    }

    let mut frames = 0u32;
    let mut clicks = 0u32;
    let mut stop_reason = StopReason::FramesLimit;

    for frame_index in 0..config.frames_limit {
        let frame = source
            .take_frame()
            .with_context(|| format!("Failed to take frame {}", frame_index))?;
        frames += 1;

        if !config.detect_only {
            let ready_buttons = find_ready_buttons(&frame, &config.buttons);
            if let Some(&(x, y)) = ready_buttons.first() {
                tracing::info!(
                    "Frame {}: {} ready buttons, clicking ({}, {})",
                    frame_index,
                    ready_buttons.len(),
                    x,
                    y
                );
                click_at(input, x as i32, y as i32, config.button_move)
                    .context("Failed to click ready button")?;
                clicks += 1;
            }
        }

        let bricks = detect_bricks_with(&frame, &config.detection, observer.as_deref_mut())
            .with_context(|| format!("Failed to detect bricks in frame {}", frame_index))?;
        tracing::info!("Frame {}: {} bricks", frame_index, bricks.len());

        if !config.detect_only {
            let Some(brick) = bricks.first() else {
                tracing::info!("No bricks left, stopping");
                stop_reason = StopReason::NoTargets;
                break;
            };
            tracing::debug!("Clicking brick at ({}, {})", brick.x, brick.y);
            click_at(input, brick.x as i32, brick.y as i32, config.target_move)
                .context("Failed to click brick")?;
            clicks += 1;
        }

        if frame_index + 1 < config.frames_limit && !config.iteration_delay.is_zero() {
            std::thread::sleep(config.iteration_delay);
        }
    }

    let summary = RunSummary {
        frames,
        clicks,
        stop_reason,
    };
    tracing::info!(
        "Finished after {} frames, {} clicks ({:?})",
        summary.frames,
        summary.clicks,
        summary.stop_reason
    );

    Ok(summary)
}
