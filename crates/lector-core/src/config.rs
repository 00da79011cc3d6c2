//! Configuration structures for the DNI reading pipeline.
//!
//! Every heuristic threshold in the pipeline lives here as a named constant
//! with a serde-backed override, so detection can be retuned for another
//! card format without touching the detection logic. The defaults are
//! empirically tuned for the physical proportions of the Peruvian DNI and
//! should be re-validated against real card samples when changed.

use serde::{Deserialize, Serialize};

/// Main configuration for the lector pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LectorConfig {
    /// Card region detection configuration.
    pub detection: DetectionConfig,

    /// Crop normalization configuration.
    pub normalize: NormalizeConfig,

    /// Text recognizer configuration.
    pub ocr: OcrConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Card region detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Gaussian blur sigma applied before edge detection.
    pub blur_sigma: f32,

    /// Canny low threshold.
    pub canny_low: f32,

    /// Canny high threshold.
    pub canny_high: f32,

    /// L-inf dilation radius used to close broken card contours.
    pub dilate_radius: u8,

    /// Number of dilation passes.
    pub dilate_iterations: u32,

    /// Minimum candidate area in pixels.
    pub min_area: u32,

    /// Lower bound of the accepted width/height aspect band.
    pub aspect_min: f32,

    /// Upper bound of the accepted width/height aspect band.
    pub aspect_max: f32,

    /// Minimum candidate area as a fraction of the full frame.
    pub min_area_fraction: f32,

    /// Margin in pixels added around the winning box before cropping,
    /// clamped to the image bounds.
    pub margin: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 1.4,
            canny_low: 50.0,
            canny_high: 150.0,
            dilate_radius: 2,
            dilate_iterations: 2,
            min_area: 5000,
            aspect_min: 1.3,
            aspect_max: 1.9,
            min_area_fraction: 0.10,
            margin: 10,
        }
    }
}

/// Crop normalization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// CLAHE clip limit (multiples of the uniform histogram level).
    pub clahe_clip_limit: f32,

    /// CLAHE tile grid size (tiles per axis).
    pub clahe_tiles: u32,

    /// Median denoise radius in pixels.
    pub denoise_radius: u32,

    /// Half-width of the adaptive binarization window.
    pub threshold_block_radius: u32,

    /// Bias subtracted from the local weighted mean before thresholding.
    pub threshold_bias: f32,

    /// L-inf erosion radius used to thicken dark strokes and close
    /// single-pixel breaks left by binarization.
    pub stroke_close_radius: u8,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            clahe_clip_limit: 2.0,
            clahe_tiles: 8,
            denoise_radius: 1,
            threshold_block_radius: 12,
            threshold_bias: 10.0,
            stroke_close_radius: 1,
        }
    }
}

/// Text recognizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Recognition language passed to tesseract.
    pub lang: String,

    /// Page segmentation mode (6 = single uniform block of text).
    pub psm: i32,

    /// OCR engine mode (1 = LSTM only).
    pub oem: i32,

    /// Assumed image DPI.
    pub dpi: i32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            lang: "spa".to_string(),
            psm: 6,
            oem: 1,
            dpi: 150,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Minimum number of populated fields (timestamp excluded) for an
    /// extraction to count as a success.
    pub min_fields: usize,

    /// Maximum length of the raw-text diagnostic attached to results.
    pub raw_text_limit: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_fields: 3,
            raw_text_limit: 500,
        }
    }
}

impl LectorConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roundtrip() {
        let config = LectorConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: LectorConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.detection.min_area, config.detection.min_area);
        assert_eq!(parsed.extraction.min_fields, 3);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: LectorConfig =
            serde_json::from_str(r#"{"detection": {"min_area": 9000}}"#).unwrap();

        assert_eq!(parsed.detection.min_area, 9000);
        assert_eq!(parsed.detection.aspect_min, 1.3);
        assert_eq!(parsed.ocr.lang, "spa");
    }
}
