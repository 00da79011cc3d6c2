//! Card region detection using edge and contour heuristics.
//!
//! Locates the rectangular sub-region of a photo most likely to be the DNI
//! card: blur, Canny edges, dilation to close broken contours, then outer
//! contour extraction filtered by area and by the card's aspect-ratio band.
//! No learned model is involved; the thresholds live in [`DetectionConfig`].

use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::contours::{BorderType, find_contours};
use imageproc::distance_transform::Norm;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::dilate;
use imageproc::rect::Rect;
use tracing::debug;

use crate::config::DetectionConfig;

/// Color and stroke width of the annotation rectangle.
const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const BOX_THICKNESS: i32 = 3;

/// A rectangular card candidate produced from one contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionCandidate {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Bounding-box area in pixels, used for candidate ranking.
    pub area: u64,
}

impl RegionCandidate {
    fn from_bounds(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        let width = max_x - min_x + 1;
        let height = max_y - min_y + 1;
        Self {
            x: min_x,
            y: min_y,
            width,
            height,
            area: width as u64 * height as u64,
        }
    }

    fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Outcome of running detection over one photo.
#[derive(Debug)]
pub struct Detection {
    /// Cropped card region (winning box expanded by the margin), or `None`
    /// when no candidate survived the filters.
    pub region: Option<DynamicImage>,

    /// The winning candidate before margin expansion.
    pub candidate: Option<RegionCandidate>,

    /// Full-frame copy with the winning box drawn, or the unmodified
    /// original when nothing was detected.
    pub annotated: RgbImage,
}

/// Card region detector.
pub struct RegionDetector {
    config: DetectionConfig,
}

impl RegionDetector {
    /// Create a detector with the given configuration.
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Detect the card region in a photo.
    ///
    /// Returns the cropped region plus an annotated full-frame copy, or an
    /// absent region with the unmodified original when no contour passes
    /// the filters.
    pub fn detect(&self, image: &DynamicImage) -> Detection {
        let (width, height) = (image.width(), image.height());
        let frame_area = width as u64 * height as u64;

        let edges = self.edge_map(image);
        let candidates = self.candidates(&edges, frame_area);

        debug!("{} candidates passed the card-shape filters", candidates.len());

        // Largest surviving candidate wins; ties keep the first one seen
        // in contour-extraction order.
        let winner = candidates
            .into_iter()
            .fold(None::<RegionCandidate>, |best, c| match best {
                Some(b) if b.area >= c.area => Some(b),
                _ => Some(c),
            });

        let mut annotated = image.to_rgb8();

        let Some(candidate) = winner else {
            return Detection {
                region: None,
                candidate: None,
                annotated,
            };
        };

        debug!(
            "winning candidate: {}x{} at ({}, {}), aspect {:.2}",
            candidate.width,
            candidate.height,
            candidate.x,
            candidate.y,
            candidate.aspect_ratio()
        );

        draw_box(&mut annotated, &candidate);

        let region = self.crop_with_margin(image, &candidate);

        Detection {
            region: Some(region),
            candidate: Some(candidate),
            annotated,
        }
    }

    /// Grayscale, blur, Canny, then dilation to close broken card edges.
    fn edge_map(&self, image: &DynamicImage) -> GrayImage {
        let gray = image.to_luma8();
        let blurred = gaussian_blur_f32(&gray, self.config.blur_sigma);
        let mut edges = canny(&blurred, self.config.canny_low, self.config.canny_high);

        for _ in 0..self.config.dilate_iterations {
            edges = dilate(&edges, Norm::LInf, self.config.dilate_radius);
        }

        edges
    }

    /// Bounding boxes of outer contours that pass the card-shape filters.
    fn candidates(&self, edges: &GrayImage, frame_area: u64) -> Vec<RegionCandidate> {
        let min_fraction_area =
            (frame_area as f64 * self.config.min_area_fraction as f64) as u64;

        find_contours::<i32>(edges)
            .into_iter()
            .filter(|c| c.border_type == BorderType::Outer)
            .filter_map(|c| {
                let mut min_x = i32::MAX;
                let mut min_y = i32::MAX;
                let mut max_x = i32::MIN;
                let mut max_y = i32::MIN;

                for p in &c.points {
                    min_x = min_x.min(p.x);
                    min_y = min_y.min(p.y);
                    max_x = max_x.max(p.x);
                    max_y = max_y.max(p.y);
                }

                if min_x > max_x {
                    return None;
                }

                Some(RegionCandidate::from_bounds(
                    min_x.max(0) as u32,
                    min_y.max(0) as u32,
                    max_x.max(0) as u32,
                    max_y.max(0) as u32,
                ))
            })
            .filter(|c| c.area >= self.config.min_area as u64)
            .filter(|c| {
                let aspect = c.aspect_ratio();
                aspect >= self.config.aspect_min && aspect <= self.config.aspect_max
            })
            .filter(|c| c.area >= min_fraction_area)
            .collect()
    }

    /// Crop the winning box expanded by the configured margin, clamped to
    /// the image bounds.
    fn crop_with_margin(&self, image: &DynamicImage, candidate: &RegionCandidate) -> DynamicImage {
        let margin = self.config.margin;

        let x0 = candidate.x.saturating_sub(margin);
        let y0 = candidate.y.saturating_sub(margin);
        let x1 = (candidate.x + candidate.width + margin).min(image.width());
        let y1 = (candidate.y + candidate.height + margin).min(image.height());

        image.crop_imm(x0, y0, x1 - x0, y1 - y0)
    }
}

/// Draw the winning bounding box as a 3-px green rectangle.
fn draw_box(canvas: &mut RgbImage, candidate: &RegionCandidate) {
    for i in 0..BOX_THICKNESS {
        let x = candidate.x as i32 - i;
        let y = candidate.y as i32 - i;
        let w = candidate.width as i64 + 2 * i as i64;
        let h = candidate.height as i64 + 2 * i as i64;

        if x < 0 || y < 0 {
            continue;
        }
        if x as i64 + w > canvas.width() as i64 || y as i64 + h > canvas.height() as i64 {
            continue;
        }

        draw_hollow_rect_mut(canvas, Rect::at(x, y).of_size(w as u32, h as u32), BOX_COLOR);
    }
}
