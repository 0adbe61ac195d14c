use super::types::{DetectError, DetectionParams, Target};
use crate::diagnostics::{render, Stage, StageObserver};
use image::{imageops, DynamicImage, GrayImage, Luma, RgbImage};
use imageproc::contours::{find_contours, Contour};
use imageproc::geometry::{arc_length, contour_area};
use imageproc::map::map_colors;
use imageproc::rect::Rect;
use std::f64::consts::PI;

const FOREGROUND: Luma<u8> = Luma([255]);
const BACKGROUND: Luma<u8> = Luma([0]);

/// Shape metrics of one contour
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRegion {
    /// Position of the contour in discovery order
    pub index: usize,
    pub area: f64,
    pub perimeter: f64,
    /// `None` for degenerate contours with zero perimeter
    pub circularity: Option<f64>,
    pub bounds: Rect,
}

impl CandidateRegion {
    /// Measure a contour. Returns `None` for a contour without points.
    pub fn from_contour(index: usize, contour: &Contour<i32>) -> Option<Self> {
        let points = &contour.points;
        let first = points.first()?;

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for point in points {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }
        let bounds = Rect::at(min_x, min_y)
            .of_size((max_x - min_x + 1) as u32, (max_y - min_y + 1) as u32);

        let area = contour_area(points);
        let perimeter = arc_length(points, true);
        let circularity = (perimeter > 0.0).then(|| 4.0 * PI * area / (perimeter * perimeter));

        Some(Self {
            index,
            area,
            perimeter,
            circularity,
            bounds,
        })
    }

    pub fn is_brick(&self, params: &DetectionParams) -> bool {
        if self.area < params.effective_min_area() {
            return false;
        }
        self.circularity
            .is_some_and(|circularity| params.circularity.contains(circularity))
    }

    /// Centre of the bounding box, rounded towards the top-left
    pub fn center(&self) -> Target {
        Target::new(
            self.bounds.left() as u32 + self.bounds.width() / 2,
            self.bounds.top() as u32 + self.bounds.height() / 2,
        )
    }
}

/// Find the click targets of all bricks in `frame`.
///
/// Bricks are dark regions whose contour is large enough and whose
/// circularity (4·π·area / perimeter²) lies strictly inside the configured
/// range. Targets come out in contour discovery order.
pub fn detect_bricks(
    frame: &RgbImage,
    params: &DetectionParams,
) -> Result<Vec<Target>, DetectError> {
    detect_bricks_with(frame, params, None)
}

/// Same as [`detect_bricks`], additionally handing every intermediate image
/// to `observer`. Stage images are only rendered when an observer is given.
pub fn detect_bricks_with(
    frame: &RgbImage,
    params: &DetectionParams,
    mut observer: Option<&mut (dyn StageObserver + '_)>,
) -> Result<Vec<Target>, DetectError> {
    let _span = tracing::debug_span!("detect_bricks").entered();

    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        return Err(DetectError::InvalidInput(format!(
            "frame is {}x{}, expected at least one pixel",
            width, height
        )));
    }
    emit(&mut observer, Stage::Input, || DynamicImage::ImageRgb8(frame.clone()));

    let gray = imageops::grayscale(frame);
    emit(&mut observer, Stage::Grayscale, || DynamicImage::ImageLuma8(gray.clone()));

    let binary = threshold_dark(&gray, params.black_threshold);
    emit(&mut observer, Stage::Binary, || DynamicImage::ImageLuma8(binary.clone()));

    let contours = find_contours::<i32>(&binary);
    emit(&mut observer, Stage::Contours, || {
        DynamicImage::ImageRgb8(render::render_contours(&gray, &contours, 0..contours.len()))
    });

    let bricks: Vec<CandidateRegion> = contours
        .iter()
        .enumerate()
        .filter_map(|(index, contour)| CandidateRegion::from_contour(index, contour))
        .filter(|region| {
            let accepted = region.is_brick(params);
            if !accepted {
                tracing::debug!(
                    "Rejected contour {}: area={:.1}, circularity={:?}",
                    region.index,
                    region.area,
                    region.circularity
                );
            }
            accepted
        })
        .collect();
    emit(&mut observer, Stage::Bricks, || {
        DynamicImage::ImageRgb8(render::render_contours(
            &gray,
            &contours,
            bricks.iter().map(|region| region.index),
        ))
    });

    let targets: Vec<Target> = bricks.iter().map(CandidateRegion::center).collect();
    emit(&mut observer, Stage::Targets, || {
        DynamicImage::ImageRgb8(render::render_targets(&gray, &targets))
    });

    tracing::debug!("{} contours, {} bricks", contours.len(), targets.len());

    Ok(targets)
}

/// Inverted binary threshold: pixels strictly darker than `black_threshold`
/// become foreground
pub fn threshold_dark(gray: &GrayImage, black_threshold: u8) -> GrayImage {
    map_colors(gray, |pixel| {
        if pixel[0] < black_threshold {
            FOREGROUND
        } else {
            BACKGROUND
        }
    })
}

fn emit<F>(observer: &mut Option<&mut (dyn StageObserver + '_)>, stage: Stage, render: F)
where
    F: FnOnce() -> DynamicImage,
{
    if let Some(observer) = observer.as_mut() {
        observer.observe(stage, &render());
    }
}
