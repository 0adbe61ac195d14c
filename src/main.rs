use anyhow::{Context, Result};
use brickclick::capture::{self, FrameSourceKind};
use brickclick::detection::{ButtonRow, CircularityRange, DetectionParams};
use brickclick::diagnostics::{DumpObserver, Observers, PreviewObserver, StageObserver};
use brickclick::driver::{self, DriverConfig};
use brickclick::input;
use clap::Parser;
use image::Rgb;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Replay frames from this directory instead of capturing the screen
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Number of frames to process
    #[arg(long, default_value_t = 1)]
    frames_limit: u32,

    /// Gray values strictly below this count as brick pixels
    #[arg(long, default_value_t = 25)]
    black_threshold: u8,

    /// Minimum brick contour area in square pixels
    #[arg(long, default_value_t = 100.0)]
    min_area: f64,

    /// Lower (exclusive) bound of the accepted circularity
    #[arg(long, default_value_t = 0.71)]
    circularity_min: f64,

    /// Upper (exclusive) bound of the accepted circularity
    #[arg(long, default_value_t = 0.75)]
    circularity_max: f64,

    /// X coordinate of the first ball button
    #[arg(long, default_value_t = 255)]
    button_x: u32,

    /// Y coordinate of the ball button row
    #[arg(long, default_value_t = 130)]
    button_y: u32,

    /// Horizontal distance between ball buttons
    #[arg(long, default_value_t = 71)]
    button_step: u32,

    /// Number of ball buttons
    #[arg(long, default_value_t = 6)]
    button_count: u32,

    /// Exact colour of a ball button that can be bought, as R,G,B
    #[arg(long, default_value = "85,212,0", value_parser = parse_rgb)]
    button_ready_color: Rgb<u8>,

    /// Delay before the first frame, in milliseconds
    #[arg(long, default_value_t = 3000)]
    start_delay_ms: u64,

    /// Delay between frames, in milliseconds
    #[arg(long, default_value_t = 250)]
    iteration_delay_ms: u64,

    /// Write every pipeline stage to the diagnostics directory, overwriting
    /// the previous frame
    #[arg(long)]
    show: bool,

    /// Pause after each previewed frame, in milliseconds
    #[arg(long, default_value_t = 0)]
    show_delay_ms: u64,

    /// Save every pipeline stage as a timestamped PNG
    #[arg(long)]
    dump: bool,

    /// Output directory for --show and --dump
    #[arg(long, default_value = "dump")]
    diagnostics_dir: PathBuf,

    /// Detect bricks without clicking anything
    #[arg(long)]
    detect_only: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn parse_rgb(value: &str) -> Result<Rgb<u8>, String> {
    let channels = value
        .split(',')
        .map(|part| part.trim().parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|err| format!("invalid colour channel in {:?}: {}", value, err))?;

    match channels.as_slice() {
        &[r, g, b] => Ok(Rgb([r, g, b])),
        _ => Err(format!("expected R,G,B, got {:?}", value)),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("brickclick starting");

    let circularity = CircularityRange::new(args.circularity_min, args.circularity_max)
        .context("Invalid circularity range")?;
    let detection = DetectionParams::new(args.black_threshold, args.min_area, circularity);
    tracing::info!(
        "Bricks: gray < {}, area >= {}, circularity in ({}, {})",
        detection.black_threshold,
        detection.effective_min_area(),
        circularity.low(),
        circularity.high()
    );

    let buttons = ButtonRow {
        first: (args.button_x, args.button_y),
        x_step: args.button_step,
        count: args.button_count,
        ready_color: args.button_ready_color,
    };

    // Initialize frame source
    let source_kind = match &args.frames_dir {
        Some(dir) => FrameSourceKind::FileBacked(dir.clone()),
        None => FrameSourceKind::LiveScreen,
    };
    let mut source = capture::create_frame_source(&source_kind)
        .with_context(|| format!("Failed to initialize frame source {:?}", source_kind))?;

    // Initialize pointer input
    let mut input =
        input::create_input_sink(args.detect_only).context("Failed to initialize pointer input")?;

    // Initialize diagnostics
    let mut observers = Observers::new();
    if args.show {
        let preview = PreviewObserver::new(
            &args.diagnostics_dir,
            Duration::from_millis(args.show_delay_ms),
        )?;
        observers.push(Box::new(preview));
    }
    if args.dump {
        observers.push(Box::new(DumpObserver::new(&args.diagnostics_dir)?));
    }
    let observer: Option<&mut dyn StageObserver> = if observers.is_empty() {
        None
    } else {
        Some(&mut observers)
    };

    let mut config = DriverConfig::new(args.frames_limit, detection, buttons);
    config.detect_only = args.detect_only;
    config.start_delay = Duration::from_millis(args.start_delay_ms);
    config.iteration_delay = Duration::from_millis(args.iteration_delay_ms);

    // Main loop
    driver::run(&mut source, &mut input, &config, observer)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_game_layout() {
        let args = Args::parse_from(["brickclick"]);
        assert_eq!(args.frames_limit, 1);
        assert_eq!(args.black_threshold, 25);
        assert_eq!(args.min_area, 100.0);
        assert_eq!((args.circularity_min, args.circularity_max), (0.71, 0.75));
        assert_eq!((args.button_x, args.button_y), (255, 130));
        assert_eq!((args.button_step, args.button_count), (71, 6));
        assert_eq!(args.button_ready_color, Rgb([85, 212, 0]));
        assert!(args.frames_dir.is_none());
        assert!(!args.detect_only);
    }

    #[test]
    fn colours_parse_as_rgb_triples() {
        assert_eq!(parse_rgb("1, 2,3"), Ok(Rgb([1, 2, 3])));
        assert!(parse_rgb("1,2").is_err());
        assert!(parse_rgb("1,2,300").is_err());
        assert!(parse_rgb("red").is_err());
    }
}
