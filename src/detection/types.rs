use image::Rgb;
use thiserror::Error;

/// Errors raised by the detection routines
#[derive(Debug, Error, PartialEq)]
pub enum DetectError {
    /// The frame has no pixels
    #[error("invalid input frame: {0}")]
    InvalidInput(String),

    /// The circularity interval is empty
    #[error("invalid circularity range ({low}, {high}): low must be below high")]
    InvalidRange { low: f64, high: f64 },
}

/// Open interval a region's circularity has to fall into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularityRange {
    low: f64,
    high: f64,
}

impl CircularityRange {
    pub fn new(low: f64, high: f64) -> Result<Self, DetectError> {
        // NaN on either side fails this comparison as well
        if !(low < high) {
            return Err(DetectError::InvalidRange { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Strict containment, both bounds excluded
    pub fn contains(&self, value: f64) -> bool {
        self.low < value && value < self.high
    }
}

/// Tunables for brick detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
    /// Gray values strictly below this are foreground
    pub black_threshold: u8,
    /// Minimum enclosed contour area, in square pixels
    pub min_area: f64,
    pub circularity: CircularityRange,
}

impl DetectionParams {
    pub fn new(black_threshold: u8, min_area: f64, circularity: CircularityRange) -> Self {
        Self {
            black_threshold,
            min_area,
            circularity,
        }
    }

    /// Minimum area with negative and NaN values clamped to zero
    pub fn effective_min_area(&self) -> f64 {
        if self.min_area > 0.0 {
            self.min_area
        } else {
            0.0
        }
    }
}

/// Click target: centre of an accepted region's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    pub x: u32,
    pub y: u32,
}

impl Target {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// A horizontal row of equally spaced UI buttons that light up in a
/// known colour once they can be pressed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonRow {
    pub first: (u32, u32),
    pub x_step: u32,
    pub count: u32,
    pub ready_color: Rgb<u8>,
}

impl ButtonRow {
    /// Screen position of button `index`, `None` if it does not fit in
    /// screen coordinates
    pub fn position(&self, index: u32) -> Option<(u32, u32)> {
        let x = index
            .checked_mul(self.x_step)
            .and_then(|offset| self.first.0.checked_add(offset))?;
        Some((x, self.first.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circularity_range_rejects_empty_interval() {
        assert_eq!(
            CircularityRange::new(0.75, 0.71),
            Err(DetectError::InvalidRange {
                low: 0.75,
                high: 0.71
            })
        );
        assert!(CircularityRange::new(0.5, 0.5).is_err());
        assert!(CircularityRange::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn circularity_range_is_open() {
        let range = CircularityRange::new(0.71, 0.75).unwrap();
        assert!(range.contains(0.72));
        assert!(!range.contains(0.71));
        assert!(!range.contains(0.75));
    }

    #[test]
    fn negative_min_area_is_clamped() {
        let range = CircularityRange::new(0.0, 1.0).unwrap();
        assert_eq!(DetectionParams::new(25, -5.0, range).effective_min_area(), 0.0);
        assert_eq!(DetectionParams::new(25, f64::NAN, range).effective_min_area(), 0.0);
        assert_eq!(DetectionParams::new(25, 100.0, range).effective_min_area(), 100.0);
    }

    #[test]
    fn button_positions_step_horizontally() {
        let row = ButtonRow {
            first: (255, 130),
            x_step: 71,
            count: 6,
            ready_color: Rgb([85, 212, 0]),
        };
        assert_eq!(row.position(0), Some((255, 130)));
        assert_eq!(row.position(2), Some((397, 130)));
    }

    #[test]
    fn button_positions_past_u32_are_none() {
        let row = ButtonRow {
            first: (255, 130),
            x_step: 1_000_000_000,
            count: 6,
            ready_color: Rgb([85, 212, 0]),
        };
        assert_eq!(row.position(4), Some((4_000_000_255, 130)));
        assert_eq!(row.position(5), None);

        let row = ButtonRow {
            first: (u32::MAX, 130),
            x_step: 1,
            ..row
        };
        assert_eq!(row.position(0), Some((u32::MAX, 130)));
        assert_eq!(row.position(1), None);
    }
}
