//! Core library for reading Peruvian DNI cards from photographs.
//!
//! This crate provides:
//! - Card region detection with edge/contour heuristics
//! - Crop normalization (CLAHE, denoise, adaptive binarization)
//! - A text-recognizer seam with a tesseract-backed implementation
//! - Rule-based DNI field extraction with per-field pattern fallbacks
//! - Result assembly (fields, annotated image, diagnostic text)

pub mod config;
pub mod detect;
pub mod dni;
pub mod error;
pub mod normalize;
pub mod ocr;
pub mod pipeline;

pub use config::{DetectionConfig, ExtractionConfig, LectorConfig, NormalizeConfig, OcrConfig};
pub use detect::{Detection, RegionCandidate, RegionDetector};
pub use dni::{DniData, DniExtractor};
pub use error::{DetectionError, ExtractionError, LectorError, OcrError, Result};
pub use normalize::ImageNormalizer;
pub use ocr::{RecognitionToken, TextRecognizer, TokenBox, build_corpus};
pub use pipeline::{Lector, LectorResult};

#[cfg(feature = "tesseract")]
pub use ocr::TesseractRecognizer;
