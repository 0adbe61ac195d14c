mod dump;
mod preview;
pub mod render;

pub use dump::DumpObserver;
pub use preview::PreviewObserver;

use image::DynamicImage;

/// Intermediate images produced by the brick detector, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Input,
    Grayscale,
    Binary,
    Contours,
    Bricks,
    Targets,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Input,
        Stage::Grayscale,
        Stage::Binary,
        Stage::Contours,
        Stage::Bricks,
        Stage::Targets,
    ];

    /// 1-based position in the pipeline, used to order files on disk
    pub fn ordinal(self) -> usize {
        match self {
            Stage::Input => 1,
            Stage::Grayscale => 2,
            Stage::Binary => 3,
            Stage::Contours => 4,
            Stage::Bricks => 5,
            Stage::Targets => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Input => "image",
            Stage::Grayscale => "image_gray",
            Stage::Binary => "image_binary",
            Stage::Contours => "image_contours",
            Stage::Bricks => "image_brick_contours",
            Stage::Targets => "image_bricks",
        }
    }

    pub fn is_last(self) -> bool {
        self == Stage::Targets
    }
}

/// Side channel receiving every intermediate image of a detection call.
///
/// Observers only look: they cannot influence the detected targets, and
/// they swallow their own failures.
pub trait StageObserver {
    fn observe(&mut self, stage: Stage, image: &DynamicImage);
}

/// Forwards each stage to several observers in turn
#[derive(Default)]
pub struct Observers {
    inner: Vec<Box<dyn StageObserver>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, observer: Box<dyn StageObserver>) {
        self.inner.push(observer);
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl StageObserver for Observers {
    fn observe(&mut self, stage: Stage, image: &DynamicImage) {
        for observer in &mut self.inner {
            observer.observe(stage, image);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Remembers which stages were seen and their dimensions
    #[derive(Default)]
    pub struct RecordingObserver {
        pub seen: Vec<(Stage, u32, u32)>,
    }

    impl StageObserver for RecordingObserver {
        fn observe(&mut self, stage: Stage, image: &DynamicImage) {
            self.seen.push((stage, image.width(), image.height()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingObserver;
    use super::*;
    use image::RgbImage;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Shared(Rc<RefCell<RecordingObserver>>);

    impl StageObserver for Shared {
        fn observe(&mut self, stage: Stage, image: &DynamicImage) {
            self.0.borrow_mut().observe(stage, image);
        }
    }

    #[test]
    fn stage_ordinals_follow_pipeline_order() {
        let ordinals: Vec<usize> = Stage::ALL.iter().map(|s| s.ordinal()).collect();
        assert_eq!(ordinals, vec![1, 2, 3, 4, 5, 6]);
        assert!(Stage::Targets.is_last());
        assert!(!Stage::Binary.is_last());
    }

    #[test]
    fn observers_fan_out() {
        let first = Rc::new(RefCell::new(RecordingObserver::default()));
        let second = Rc::new(RefCell::new(RecordingObserver::default()));
        let mut observers = Observers::new();
        assert!(observers.is_empty());
        observers.push(Box::new(Shared(first.clone())));
        observers.push(Box::new(Shared(second.clone())));

        let image = DynamicImage::ImageRgb8(RgbImage::new(4, 3));
        observers.observe(Stage::Binary, &image);

        assert_eq!(first.borrow().seen, vec![(Stage::Binary, 4, 3)]);
        assert_eq!(second.borrow().seen, vec![(Stage::Binary, 4, 3)]);
    }
}
