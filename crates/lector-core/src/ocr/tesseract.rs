//! Tesseract-backed implementation of the recognizer seam.
//!
//! Wraps the system tesseract binary through `rusty_tesseract`. The
//! recognizer probes the binary at construction so a broken install fails
//! at startup instead of on the first request; after that it carries no
//! mutable state and can be shared read-only across requests.

use std::collections::HashMap;

use image::DynamicImage;
use rusty_tesseract::{Args, Image};
use tracing::debug;

use super::{RecognitionToken, TextRecognizer, TokenBox};
use crate::config::OcrConfig;
use crate::error::OcrError;

/// Text recognizer backed by the system tesseract binary.
pub struct TesseractRecognizer {
    args: Args,
}

impl TesseractRecognizer {
    /// Create a recognizer, verifying that tesseract is installed.
    pub fn new(config: OcrConfig) -> Result<Self, OcrError> {
        let version = rusty_tesseract::get_tesseract_version()
            .map_err(|e| OcrError::Unavailable(e.to_string()))?;
        debug!("tesseract available: {}", version.trim());

        Ok(Self {
            args: Args {
                lang: config.lang,
                config_variables: HashMap::new(),
                dpi: Some(config.dpi),
                psm: Some(config.psm),
                oem: Some(config.oem),
            },
        })
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<Vec<RecognitionToken>, OcrError> {
        let input =
            Image::from_dynamic_image(image).map_err(|e| OcrError::InvalidImage(e.to_string()))?;

        let output = rusty_tesseract::image_to_data(&input, &self.args)
            .map_err(|e| OcrError::Recognition(e.to_string()))?;

        // Level 5 rows are individual words; negative confidence marks
        // layout-only rows without text.
        let tokens: Vec<RecognitionToken> = output
            .data
            .into_iter()
            .filter(|d| d.level == 5 && d.conf >= 0.0 && !d.text.trim().is_empty())
            .map(|d| {
                RecognitionToken::new(
                    TokenBox {
                        x: d.left,
                        y: d.top,
                        width: d.width,
                        height: d.height,
                    },
                    d.text.trim().to_string(),
                    d.conf / 100.0,
                )
            })
            .collect();

        debug!("recognized {} tokens", tokens.len());
        Ok(tokens)
    }
}
