//! Text recognition seam.
//!
//! The recognizer itself is an external capability: this module defines the
//! boundary types and trait the pipeline consumes, plus the tesseract-backed
//! implementation behind the `tesseract` feature. The pipeline runs the
//! recognizer twice per request (raw crop, then normalized crop) and merges
//! both passes into one corpus string.

#[cfg(feature = "tesseract")]
mod tesseract;

#[cfg(feature = "tesseract")]
pub use tesseract::TesseractRecognizer;

use image::DynamicImage;

use crate::error::OcrError;

/// Axis-aligned bounding box of a recognized text fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// One recognized text fragment with position and confidence.
///
/// Token order is recognizer-internal and not guaranteed spatially sorted;
/// only the text component is consumed downstream.
#[derive(Debug, Clone)]
pub struct RecognitionToken {
    pub bbox: TokenBox,
    pub text: String,
    pub confidence: f32,
}

impl RecognitionToken {
    pub fn new(bbox: TokenBox, text: impl Into<String>, confidence: f32) -> Self {
        Self {
            bbox,
            text: text.into(),
            confidence,
        }
    }
}

/// External text recognizer interface.
///
/// Implementations hold process-wide state initialized once; `recognize`
/// must be safe to call from the pipeline for every request without
/// re-initialization.
pub trait TextRecognizer: Send + Sync {
    /// Recognize text fragments in a raster region.
    fn recognize(&self, image: &DynamicImage) -> Result<Vec<RecognitionToken>, OcrError>;
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for std::sync::Arc<T> {
    fn recognize(&self, image: &DynamicImage) -> Result<Vec<RecognitionToken>, OcrError> {
        (**self).recognize(image)
    }
}

/// Merge the raw-pass and normalized-pass tokens into one corpus string.
///
/// Token texts are space-joined within a pass, raw pass first, with a
/// single space between the passes.
pub fn build_corpus(raw: &[RecognitionToken], normalized: &[RecognitionToken]) -> String {
    let join = |tokens: &[RecognitionToken]| {
        tokens
            .iter()
            .map(|t| t.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    };

    let first = join(raw);
    let second = join(normalized);

    match (first.is_empty(), second.is_empty()) {
        (true, _) => second,
        (_, true) => first,
        _ => format!("{first} {second}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str) -> RecognitionToken {
        RecognitionToken::new(
            TokenBox {
                x: 0,
                y: 0,
                width: 10,
                height: 10,
            },
            text,
            0.9,
        )
    }

    #[test]
    fn test_corpus_orders_raw_pass_first() {
        let raw = vec![token("PRIMER"), token("APELLIDO")];
        let normalized = vec![token("GARCIA")];

        assert_eq!(build_corpus(&raw, &normalized), "PRIMER APELLIDO GARCIA");
    }

    #[test]
    fn test_corpus_skips_empty_tokens() {
        let raw = vec![token("DNI"), token("  "), token("12345678")];

        assert_eq!(build_corpus(&raw, &[]), "DNI 12345678");
    }

    #[test]
    fn test_corpus_with_both_passes_empty() {
        assert_eq!(build_corpus(&[], &[]), "");
    }
}
