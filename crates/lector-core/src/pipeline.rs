//! End-to-end DNI reading pipeline.
//!
//! Wires the stages together: decode, region detection, crop
//! normalization, two recognition passes, field extraction, and result
//! assembly. Synchronous and blocking; the only shared state between
//! requests is the read-only recognizer handle injected at construction.

use std::io::Cursor;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{DynamicImage, ImageFormat, RgbImage};
use tracing::{debug, info};

use crate::config::LectorConfig;
use crate::detect::RegionDetector;
use crate::dni::{DniData, DniExtractor};
use crate::error::{DetectionError, LectorError, Result};
use crate::normalize::ImageNormalizer;
use crate::ocr::{TextRecognizer, build_corpus};

/// Assembled outcome of one successful DNI read.
#[derive(Debug, serde::Serialize)]
pub struct LectorResult {
    /// Extracted field set.
    pub datos: DniData,

    /// Annotated full-frame image as a base64 JPEG.
    pub imagen: String,

    /// Truncated raw recognition corpus, for diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texto: Option<String>,
}

/// DNI reading pipeline.
///
/// The recognizer is constructor-injected and shared read-only; build it
/// once at process startup and reuse the `Lector` for every request.
pub struct Lector<R: TextRecognizer> {
    recognizer: R,
    detector: RegionDetector,
    normalizer: ImageNormalizer,
    extractor: DniExtractor,
    raw_text_limit: usize,
}

impl<R: TextRecognizer> Lector<R> {
    /// Create a pipeline around an initialized recognizer.
    pub fn new(recognizer: R, config: LectorConfig) -> Self {
        Self {
            recognizer,
            detector: RegionDetector::new(config.detection),
            normalizer: ImageNormalizer::new(config.normalize),
            extractor: DniExtractor::new(config.extraction.clone()),
            raw_text_limit: config.extraction.raw_text_limit,
        }
    }

    /// Read a DNI card from an image file.
    pub fn read_dni(&self, path: &Path) -> Result<LectorResult> {
        info!("reading DNI from {}", path.display());
        let image = image::open(path)?;
        self.process(&image)
    }

    /// Run the pipeline over an already-decoded photo.
    pub fn process(&self, image: &DynamicImage) -> Result<LectorResult> {
        let detection = self.detector.detect(image);

        let Some(region) = detection.region else {
            return Err(DetectionError::NoRegion.into());
        };

        let normalized = self.normalizer.normalize(&region);

        // Two recognition passes: the raw crop and the binarized variant.
        let raw_tokens = self.recognizer.recognize(&region)?;
        let normalized_tokens = self
            .recognizer
            .recognize(&DynamicImage::ImageLuma8(normalized))?;

        let corpus = build_corpus(&raw_tokens, &normalized_tokens);
        debug!(
            "corpus: {} chars from {} + {} tokens",
            corpus.len(),
            raw_tokens.len(),
            normalized_tokens.len()
        );

        let datos = self.extractor.extract(&corpus)?;
        let imagen = encode_annotated(&detection.annotated)?;
        let texto = Some(corpus.chars().take(self.raw_text_limit).collect());

        Ok(LectorResult {
            datos,
            imagen,
            texto,
        })
    }
}

/// Encode the annotated image as a base64 JPEG for transport.
pub fn encode_annotated(image: &RgbImage) -> Result<String> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image.clone()).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)?;
    Ok(BASE64.encode(bytes))
}

/// Decode a base64 JPEG back into a raster.
pub fn decode_annotated(encoded: &str) -> Result<RgbImage> {
    let bytes = BASE64
        .decode(encoded)
        .map_err(|e| LectorError::Config(format!("invalid base64 image: {e}")))?;
    Ok(image::load_from_memory(&bytes)?.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use crate::ocr::{RecognitionToken, TokenBox};
    use image::{GrayImage, Luma};

    /// Recognizer that replays a fixed token list for every pass.
    struct StubRecognizer {
        words: Vec<&'static str>,
    }

    impl TextRecognizer for StubRecognizer {
        fn recognize(&self, _image: &DynamicImage) -> std::result::Result<Vec<RecognitionToken>, OcrError> {
            Ok(self
                .words
                .iter()
                .map(|w| {
                    RecognitionToken::new(
                        TokenBox {
                            x: 0,
                            y: 0,
                            width: 10,
                            height: 10,
                        },
                        *w,
                        0.9,
                    )
                })
                .collect())
        }
    }

    fn card_photo() -> DynamicImage {
        let mut img = GrayImage::new(600, 400);
        for y in 80..300 {
            for x in 100..430 {
                img.put_pixel(x, y, Luma([255]));
            }
        }
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn test_detection_failure_surfaces_as_error() {
        let lector = Lector::new(
            StubRecognizer { words: vec![] },
            LectorConfig::default(),
        );
        let blank = DynamicImage::ImageLuma8(GrayImage::new(600, 400));

        let err = lector.process(&blank).unwrap_err();
        assert_eq!(err.code(), "DNI_NOT_DETECTED");
    }

    #[test]
    fn test_insufficient_extraction_surfaces_as_error() {
        let lector = Lector::new(
            StubRecognizer {
                words: vec!["SEXO", "M"],
            },
            LectorConfig::default(),
        );

        let err = lector.process(&card_photo()).unwrap_err();
        assert_eq!(err.code(), "INSUFFICIENT_DATA");
    }

    #[test]
    fn test_annotated_image_round_trip_preserves_dimensions() {
        let annotated = RgbImage::new(320, 200);
        let encoded = encode_annotated(&annotated).unwrap();
        let decoded = decode_annotated(&encoded).unwrap();

        assert_eq!(decoded.dimensions(), (320, 200));
    }

    #[test]
    fn test_raw_text_is_truncated() {
        let mut config = LectorConfig::default();
        config.extraction.raw_text_limit = 10;

        let lector = Lector::new(
            StubRecognizer {
                words: vec!["DNI", "46218573", "SEXO", "F", "ESTADO", "CIVIL", "SOLTERA"],
            },
            config,
        );

        let result = lector.process(&card_photo()).unwrap();
        assert_eq!(result.texto.as_deref().map(|t| t.chars().count()), Some(10));
    }
}
