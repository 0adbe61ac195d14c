use crate::detection::Target;
use image::{GrayImage, Rgb, RgbImage};
use imageproc::contours::Contour;
use imageproc::drawing::{draw_line_segment_mut, draw_polygon_mut};

const MARKER_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
const MARKER_HALF_SIZE: f32 = 10.0;

/// Expand a grayscale map into a 3-channel image so colours can be drawn on it
pub fn gray_to_rgb(gray: &GrayImage) -> RgbImage {
    let (width, height) = gray.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let value = gray.get_pixel(x, y)[0];
        Rgb([value, value, value])
    })
}

/// Stable pseudo-random colour for contour `index`
pub fn contour_color(index: usize) -> Rgb<u8> {
    let seed = (index as u32).wrapping_add(1).wrapping_mul(2_654_435_761);
    Rgb([
        (seed >> 24) as u8 | 0x40,
        (seed >> 16) as u8 | 0x40,
        (seed >> 8) as u8 | 0x40,
    ])
}

/// Fill the contours whose indices are listed, each in its own colour, on
/// top of the grayscale map
pub fn render_contours(
    gray: &GrayImage,
    contours: &[Contour<i32>],
    indices: impl IntoIterator<Item = usize>,
) -> RgbImage {
    let mut canvas = gray_to_rgb(gray);
    for index in indices {
        if let Some(contour) = contours.get(index) {
            fill_contour(&mut canvas, contour, contour_color(index));
        }
    }
    canvas
}

/// Draw a cross marker at every target on top of the grayscale map
pub fn render_targets(gray: &GrayImage, targets: &[Target]) -> RgbImage {
    let mut canvas = gray_to_rgb(gray);
    for target in targets {
        let (x, y) = (target.x as f32, target.y as f32);
        // Two pixels thick
        for offset in [0.0, 1.0] {
            draw_line_segment_mut(
                &mut canvas,
                (x - MARKER_HALF_SIZE, y + offset),
                (x + MARKER_HALF_SIZE, y + offset),
                MARKER_COLOR,
            );
            draw_line_segment_mut(
                &mut canvas,
                (x + offset, y - MARKER_HALF_SIZE),
                (x + offset, y + MARKER_HALF_SIZE),
                MARKER_COLOR,
            );
        }
    }
    canvas
}

fn fill_contour(canvas: &mut RgbImage, contour: &Contour<i32>, color: Rgb<u8>) {
    let points = &contour.points;
    let closed_polygon = points.len() >= 3 && points.first() != points.last();

    if closed_polygon {
        draw_polygon_mut(canvas, points, color);
        return;
    }

    // Specks and slivers: paint the border pixels directly
    for point in points {
        if point.x >= 0
            && point.y >= 0
            && (point.x as u32) < canvas.width()
            && (point.y as u32) < canvas.height()
        {
            canvas.put_pixel(point.x as u32, point.y as u32, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::contours::BorderType;
    use imageproc::point::Point;

    #[test]
    fn gray_expansion_copies_intensity() {
        let gray = GrayImage::from_fn(3, 2, |x, y| Luma([(x * 10 + y) as u8]));
        let rgb = gray_to_rgb(&gray);
        assert_eq!(rgb.dimensions(), (3, 2));
        assert_eq!(*rgb.get_pixel(2, 1), Rgb([21, 21, 21]));
    }

    #[test]
    fn contour_colors_are_stable() {
        assert_eq!(contour_color(3), contour_color(3));
        assert_ne!(contour_color(0), contour_color(1));
    }

    #[test]
    fn speck_contours_are_painted_without_panicking() {
        let gray = GrayImage::from_pixel(8, 8, Luma([200]));
        let contours = vec![
            Contour::new(vec![Point::new(2, 2)], BorderType::Outer, None),
            Contour::new(vec![Point::new(5, 5), Point::new(6, 5)], BorderType::Outer, None),
        ];
        let canvas = render_contours(&gray, &contours, [0, 1]);
        assert_eq!(*canvas.get_pixel(2, 2), contour_color(0));
        assert_eq!(*canvas.get_pixel(6, 5), contour_color(1));
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([200, 200, 200]));
    }

    #[test]
    fn only_listed_contours_are_filled() {
        let gray = GrayImage::from_pixel(20, 20, Luma([200]));
        let square = |x0: i32| {
            Contour::new(
                vec![
                    Point::new(x0, 2),
                    Point::new(x0, 6),
                    Point::new(x0 + 4, 6),
                    Point::new(x0 + 4, 2),
                ],
                BorderType::Outer,
                None,
            )
        };
        let contours = vec![square(2), square(12)];
        let canvas = render_contours(&gray, &contours, [1]);
        assert_eq!(*canvas.get_pixel(4, 4), Rgb([200, 200, 200]));
        assert_eq!(*canvas.get_pixel(14, 4), contour_color(1));
    }

    #[test]
    fn markers_are_drawn_at_targets() {
        let gray = GrayImage::from_pixel(40, 40, Luma([0]));
        let canvas = render_targets(&gray, &[Target::new(20, 20)]);
        assert_eq!(*canvas.get_pixel(20, 20), MARKER_COLOR);
        assert_eq!(*canvas.get_pixel(25, 20), MARKER_COLOR);
        assert_eq!(*canvas.get_pixel(20, 15), MARKER_COLOR);
        assert_eq!(*canvas.get_pixel(5, 5), Rgb([0, 0, 0]));
    }
}
