use super::InputSink;
use anyhow::{Context, Result};
use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use std::time::Duration;

/// Intermediate pointer positions per second of movement
const TWEEN_STEPS_PER_SECOND: f64 = 60.0;

/// Real pointer driven through the OS input APIs
pub struct EnigoInput {
    enigo: Enigo,
}

impl EnigoInput {
    pub fn new() -> Result<Self> {
        tracing::info!("Connecting to the input system");

        let enigo = Enigo::new(&Settings::default()).context("Failed to initialize enigo")?;

        Ok(Self { enigo })
    }
}

impl InputSink for EnigoInput {
    fn move_to(&mut self, x: i32, y: i32, duration: Duration) -> Result<()> {
        let steps = (duration.as_secs_f64() * TWEEN_STEPS_PER_SECOND).round() as u32;
        if steps <= 1 {
            self.enigo
                .move_mouse(x, y, Coordinate::Abs)
                .context("Failed to move pointer")?;
            return Ok(());
        }

        let start = self
            .enigo
            .location()
            .context("Failed to read pointer location")?;
        let step_delay = duration / steps;
        for (px, py) in tween(start, (x, y), steps) {
            self.enigo
                .move_mouse(px, py, Coordinate::Abs)
                .context("Failed to move pointer")?;
            std::thread::sleep(step_delay);
        }

        Ok(())
    }

    fn mouse_down(&mut self) -> Result<()> {
        self.enigo
            .button(Button::Left, Direction::Press)
            .context("Failed to press mouse button")?;
        Ok(())
    }

    fn mouse_up(&mut self) -> Result<()> {
        self.enigo
            .button(Button::Left, Direction::Release)
            .context("Failed to release mouse button")?;
        Ok(())
    }
}

/// Linear path from `from` to `to` in `steps` moves, ending exactly at `to`
fn tween(from: (i32, i32), to: (i32, i32), steps: u32) -> Vec<(i32, i32)> {
    (1..=steps)
        .map(|step| {
            let t = step as f64 / steps as f64;
            let x = from.0 as f64 + (to.0 - from.0) as f64 * t;
            let y = from.1 as f64 + (to.1 - from.1) as f64 * t;
            (x.round() as i32, y.round() as i32)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tween_ends_at_destination() {
        let path = tween((0, 0), (100, -50), 4);
        assert_eq!(path, vec![(25, -13), (50, -25), (75, -38), (100, -50)]);
    }

    #[test]
    fn single_step_tween_jumps() {
        assert_eq!(tween((5, 5), (9, 1), 1), vec![(9, 1)]);
    }
}
