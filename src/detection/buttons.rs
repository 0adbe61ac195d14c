use super::types::ButtonRow;
use image::RgbImage;

/// Positions of the buttons in `row` whose pixel exactly matches the ready
/// colour, in row order. Buttons outside the frame, or beyond the range of
/// screen coordinates, are skipped.
pub fn find_ready_buttons(frame: &RgbImage, row: &ButtonRow) -> Vec<(u32, u32)> {
    let (width, height) = frame.dimensions();

    (0..row.count)
        .filter_map(|index| {
            let position = row.position(index);
            if position.is_none() {
                tracing::debug!("Button {} lies beyond screen coordinates", index);
            }
            position
        })
        .filter(|&(x, y)| {
            if x >= width || y >= height {
                tracing::debug!(
                    "Button at ({}, {}) lies outside the {}x{} frame",
                    x,
                    y,
                    width,
                    height
                );
                return false;
            }
            *frame.get_pixel(x, y) == row.ready_color
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const READY: Rgb<u8> = Rgb([85, 212, 0]);

    fn row(count: u32) -> ButtonRow {
        ButtonRow {
            first: (10, 5),
            x_step: 20,
            count,
            ready_color: READY,
        }
    }

    #[test]
    fn only_exact_colour_matches_are_ready() {
        let mut frame = RgbImage::from_pixel(100, 20, Rgb([40, 40, 40]));
        frame.put_pixel(10, 5, READY);
        frame.put_pixel(30, 5, Rgb([85, 212, 1]));
        frame.put_pixel(50, 5, READY);

        assert_eq!(find_ready_buttons(&frame, &row(4)), vec![(10, 5), (50, 5)]);
    }

    #[test]
    fn buttons_past_the_frame_edge_are_skipped() {
        let mut frame = RgbImage::from_pixel(60, 20, READY);
        frame.put_pixel(30, 5, Rgb([0, 0, 0]));

        // Buttons at x = 10, 30, 50, 70, 90; the last two are off-frame
        assert_eq!(find_ready_buttons(&frame, &row(5)), vec![(10, 5), (50, 5)]);
    }

    #[test]
    fn huge_button_step_is_skipped_not_wrapped() {
        let frame = RgbImage::from_pixel(10, 10, READY);
        let row = ButtonRow {
            first: (2, 3),
            x_step: 1_000_000_000,
            count: 6,
            ready_color: READY,
        };

        // Only the first button is on-frame; the others overflow or lie far away
        assert_eq!(find_ready_buttons(&frame, &row), vec![(2, 3)]);
    }

    #[test]
    fn empty_row_finds_nothing() {
        let frame = RgbImage::from_pixel(60, 20, READY);
        assert!(find_ready_buttons(&frame, &row(0)).is_empty());
    }
}
