//! Crop normalization for text recognition.
//!
//! Enhances the cropped card region before the second recognition pass:
//! local contrast equalization, denoising, adaptive binarization, and a
//! closing pass that reconnects strokes broken by binarization. The whole
//! pipeline is a deterministic function of its input.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::filter::median_filter;
use imageproc::morphology::erode;

use crate::config::NormalizeConfig;

/// Crop normalizer.
pub struct ImageNormalizer {
    config: NormalizeConfig,
}

impl ImageNormalizer {
    /// Create a normalizer with the given configuration.
    pub fn new(config: NormalizeConfig) -> Self {
        Self { config }
    }

    /// Produce the binarized variant of a cropped card region.
    ///
    /// The output has the same dimensions as the input.
    pub fn normalize(&self, region: &DynamicImage) -> GrayImage {
        let gray = region.to_luma8();

        let equalized = clahe(&gray, self.config.clahe_clip_limit, self.config.clahe_tiles);
        let denoised = median_filter(
            &equalized,
            self.config.denoise_radius,
            self.config.denoise_radius,
        );
        let binary = gaussian_adaptive_threshold(
            &denoised,
            self.config.threshold_block_radius,
            self.config.threshold_bias,
        );

        // The threshold emits black text on white background. Erosion is
        // the min filter, so on this polarity it thickens black strokes
        // and closes single-pixel breaks in them.
        erode(&binary, Norm::LInf, self.config.stroke_close_radius)
    }
}

/// Contrast-limited adaptive histogram equalization over a fixed tile grid.
///
/// Each tile gets a clip-limited equalization lookup table; pixel values are
/// bilinearly interpolated between the tables of the four nearest tile
/// centers to avoid visible tile seams.
pub fn clahe(image: &GrayImage, clip_limit: f32, tiles: u32) -> GrayImage {
    let (width, height) = image.dimensions();
    let tiles = tiles.max(1).min(width.max(1)).min(height.max(1));

    if width == 0 || height == 0 {
        return image.clone();
    }

    let tile_w = width.div_ceil(tiles);
    let tile_h = height.div_ceil(tiles);

    // One equalization LUT per tile.
    let mut luts = Vec::with_capacity((tiles * tiles) as usize);
    for ty in 0..tiles {
        for tx in 0..tiles {
            let x0 = tx * tile_w;
            let y0 = ty * tile_h;
            let x1 = (x0 + tile_w).min(width);
            let y1 = (y0 + tile_h).min(height);
            luts.push(tile_lut(image, x0, y0, x1, y1, clip_limit));
        }
    }

    let lut_at = |tx: u32, ty: u32| -> &[f32; 256] { &luts[(ty * tiles + tx) as usize] };

    let mut result = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let v = image.get_pixel(x, y)[0] as usize;

            // Position relative to tile centers.
            let fx = (x as f32 - tile_w as f32 / 2.0) / tile_w as f32;
            let fy = (y as f32 - tile_h as f32 / 2.0) / tile_h as f32;

            let tx0 = fx.floor().max(0.0) as u32;
            let ty0 = fy.floor().max(0.0) as u32;
            let tx0 = tx0.min(tiles - 1);
            let ty0 = ty0.min(tiles - 1);
            let tx1 = (tx0 + 1).min(tiles - 1);
            let ty1 = (ty0 + 1).min(tiles - 1);

            let wx = (fx - fx.floor()).clamp(0.0, 1.0);
            let wy = (fy - fy.floor()).clamp(0.0, 1.0);

            let top = lut_at(tx0, ty0)[v] * (1.0 - wx) + lut_at(tx1, ty0)[v] * wx;
            let bottom = lut_at(tx0, ty1)[v] * (1.0 - wx) + lut_at(tx1, ty1)[v] * wx;
            let value = top * (1.0 - wy) + bottom * wy;

            result.put_pixel(x, y, Luma([(value * 255.0).round().clamp(0.0, 255.0) as u8]));
        }
    }

    result
}

/// Clip-limited equalization lookup table for one tile.
fn tile_lut(image: &GrayImage, x0: u32, y0: u32, x1: u32, y1: u32, clip_limit: f32) -> [f32; 256] {
    let mut histogram = [0u32; 256];
    let mut count = 0u32;

    for y in y0..y1 {
        for x in x0..x1 {
            histogram[image.get_pixel(x, y)[0] as usize] += 1;
            count += 1;
        }
    }

    if count == 0 {
        let mut identity = [0.0f32; 256];
        for (i, v) in identity.iter_mut().enumerate() {
            *v = i as f32 / 255.0;
        }
        return identity;
    }

    // Clip bins above the limit and spread the excess uniformly.
    let ceiling = ((clip_limit * count as f32) / 256.0).max(1.0) as u32;
    let mut excess = 0u32;
    for bin in histogram.iter_mut() {
        if *bin > ceiling {
            excess += *bin - ceiling;
            *bin = ceiling;
        }
    }
    let bonus = excess / 256;
    for bin in histogram.iter_mut() {
        *bin += bonus;
    }

    let mut lut = [0.0f32; 256];
    let mut cumulative = 0u32;
    let total: u32 = histogram.iter().sum();
    for (i, &bin) in histogram.iter().enumerate() {
        cumulative += bin;
        lut[i] = cumulative as f32 / total as f32;
    }

    lut
}

/// Gaussian-weighted adaptive binarization.
///
/// Threshold for each pixel is the Gaussian-weighted mean of the
/// surrounding (2 * radius + 1) window minus a fixed bias, computed with
/// two separable passes.
pub fn gaussian_adaptive_threshold(image: &GrayImage, radius: u32, bias: f32) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let kernel = gaussian_kernel(radius);
    let r = radius as i64;

    // Horizontal pass.
    let mut horizontal = vec![0.0f32; (width * height) as usize];
    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let mut sum = 0.0f32;
            let mut weight = 0.0f32;
            for (k, &w) in kernel.iter().enumerate() {
                let sx = x + k as i64 - r;
                if sx < 0 || sx >= width as i64 {
                    continue;
                }
                sum += w * image.get_pixel(sx as u32, y as u32)[0] as f32;
                weight += w;
            }
            horizontal[(y as u32 * width + x as u32) as usize] = sum / weight;
        }
    }

    // Vertical pass plus thresholding.
    let mut result = GrayImage::new(width, height);
    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let mut sum = 0.0f32;
            let mut weight = 0.0f32;
            for (k, &w) in kernel.iter().enumerate() {
                let sy = y + k as i64 - r;
                if sy < 0 || sy >= height as i64 {
                    continue;
                }
                sum += w * horizontal[(sy as u32 * width + x as u32) as usize];
                weight += w;
            }
            let local_mean = sum / weight;
            let pixel = image.get_pixel(x as u32, y as u32)[0] as f32;
            let value = if pixel > local_mean - bias { 255 } else { 0 };
            result.put_pixel(x as u32, y as u32, Luma([value]));
        }
    }

    result
}

fn gaussian_kernel(radius: u32) -> Vec<f32> {
    let size = 2 * radius + 1;
    // OpenCV's sigma heuristic for a given kernel size.
    let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let sigma = sigma.max(0.1);

    let mut kernel = Vec::with_capacity(size as usize);
    for i in 0..size {
        let d = i as f32 - radius as f32;
        kernel.push((-d * d / (2.0 * sigma * sigma)).exp());
    }
    let total: f32 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= total;
    }
    kernel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NormalizeConfig;

    fn gradient_image(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| Luma([(x * 255 / width.max(1)) as u8]))
    }

    #[test]
    fn test_normalize_preserves_dimensions() {
        let normalizer = ImageNormalizer::new(NormalizeConfig::default());
        let region = DynamicImage::ImageLuma8(gradient_image(160, 100));

        let normalized = normalizer.normalize(&region);
        assert_eq!(normalized.dimensions(), (160, 100));
    }

    #[test]
    fn test_normalize_output_is_binary() {
        let normalizer = ImageNormalizer::new(NormalizeConfig::default());
        let region = DynamicImage::ImageLuma8(gradient_image(120, 80));

        let normalized = normalizer.normalize(&region);
        assert!(normalized.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let normalizer = ImageNormalizer::new(NormalizeConfig::default());
        let region = DynamicImage::ImageLuma8(gradient_image(90, 60));

        let first = normalizer.normalize(&region);
        let second = normalizer.normalize(&region);
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn test_clahe_spreads_narrow_histogram() {
        // A low-contrast image should come out with a wider value range.
        let narrow = GrayImage::from_fn(64, 64, |x, y| Luma([120 + ((x + y) % 16) as u8]));
        let equalized = clahe(&narrow, 2.0, 8);

        let min = equalized.pixels().map(|p| p[0]).min().unwrap();
        let max = equalized.pixels().map(|p| p[0]).max().unwrap();
        assert!(max - min > 60, "contrast range {} too narrow", max - min);
    }

    #[test]
    fn test_normalize_reconnects_broken_strokes() {
        // Dark 3-px stroke on a light card with a one-pixel break.
        let mut img = GrayImage::from_pixel(60, 30, Luma([220]));
        for y in 13..16 {
            for x in 10..48 {
                if x != 28 {
                    img.put_pixel(x, y, Luma([30]));
                }
            }
        }

        let normalizer = ImageNormalizer::new(NormalizeConfig::default());
        let normalized = normalizer.normalize(&DynamicImage::ImageLuma8(img));

        // The stroke stays black and the break is closed.
        assert_eq!(normalized.get_pixel(20, 14)[0], 0);
        assert_eq!(normalized.get_pixel(28, 14)[0], 0);
        // Background away from the stroke stays white.
        assert_eq!(normalized.get_pixel(5, 5)[0], 255);
    }

    #[test]
    fn test_adaptive_threshold_splits_dark_and_light() {
        let mut img = GrayImage::from_pixel(40, 40, Luma([200]));
        for y in 15..25 {
            for x in 15..25 {
                img.put_pixel(x, y, Luma([30]));
            }
        }

        let binary = gaussian_adaptive_threshold(&img, 6, 5.0);
        assert_eq!(binary.get_pixel(20, 20)[0], 0);
        assert_eq!(binary.get_pixel(2, 2)[0], 255);
    }
}
