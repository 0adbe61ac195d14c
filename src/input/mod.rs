#[cfg(feature = "pointer")]
mod pointer;

#[cfg(feature = "pointer")]
pub use pointer::EnigoInput;

use anyhow::Result;
use std::time::Duration;

/// Trait for pointer input destinations
pub trait InputSink {
    /// Move the pointer to an absolute screen position, taking roughly
    /// `duration` to get there
    fn move_to(&mut self, x: i32, y: i32, duration: Duration) -> Result<()>;

    /// Press the primary button
    fn mouse_down(&mut self) -> Result<()>;

    /// Release the primary button
    fn mouse_up(&mut self) -> Result<()>;
}

/// Move to `(x, y)` and click the primary button there
pub fn click_at<I>(input: &mut I, x: i32, y: i32, duration: Duration) -> Result<()>
where
    I: InputSink + ?Sized,
{
    input.move_to(x, y, duration)?;
    input.mouse_down()?;
    input.mouse_up()
}

/// Stand-in sink for detect-only runs, refuses every call
pub struct DisabledInput;

impl InputSink for DisabledInput {
    fn move_to(&mut self, x: i32, y: i32, _duration: Duration) -> Result<()> {
        anyhow::bail!("pointer input is disabled, refusing to move to ({}, {})", x, y)
    }

    fn mouse_down(&mut self) -> Result<()> {
        anyhow::bail!("pointer input is disabled")
    }

    fn mouse_up(&mut self) -> Result<()> {
        anyhow::bail!("pointer input is disabled")
    }
}

/// Create the sink the driver clicks through. Detect-only runs get a
/// [`DisabledInput`] and never touch the OS input APIs.
pub fn create_input_sink(detect_only: bool) -> Result<Box<dyn InputSink>> {
    if detect_only {
        tracing::info!("Running in detect-only mode (no clicks)");
        return Ok(Box::new(DisabledInput));
    }

    #[cfg(feature = "pointer")]
    {
        Ok(Box::new(EnigoInput::new()?))
    }
    #[cfg(not(feature = "pointer"))]
    {
        anyhow::bail!(
            "built without pointer input, rebuild with `--features pointer` or pass --detect-only"
        )
    }
}

impl<I: InputSink + ?Sized> InputSink for Box<I> {
    fn move_to(&mut self, x: i32, y: i32, duration: Duration) -> Result<()> {
        (**self).move_to(x, y, duration)
    }

    fn mouse_down(&mut self) -> Result<()> {
        (**self).mouse_down()
    }

    fn mouse_up(&mut self) -> Result<()> {
        (**self).mouse_up()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Event {
        Move(i32, i32, Duration),
        Down,
        Up,
    }

    /// Records every call instead of touching the real pointer
    #[derive(Default)]
    pub struct RecordingInput {
        pub events: Vec<Event>,
    }

    impl InputSink for RecordingInput {
        fn move_to(&mut self, x: i32, y: i32, duration: Duration) -> Result<()> {
            self.events.push(Event::Move(x, y, duration));
            Ok(())
        }

        fn mouse_down(&mut self) -> Result<()> {
            self.events.push(Event::Down);
            Ok(())
        }

        fn mouse_up(&mut self) -> Result<()> {
            self.events.push(Event::Up);
            Ok(())
        }
    }
}
