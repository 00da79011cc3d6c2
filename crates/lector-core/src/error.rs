//! Error types for the lector-core library.

use thiserror::Error;

/// Main error type for the lector library.
#[derive(Error, Debug)]
pub enum LectorError {
    /// Image bytes could not be decoded into a raster.
    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),

    /// Region detection error.
    #[error("detection error: {0}")]
    Detection(#[from] DetectionError),

    /// Text recognition error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to card region detection.
#[derive(Error, Debug)]
pub enum DetectionError {
    /// No contour passed the card-shape filter heuristics.
    #[error("no card-shaped region detected in the image")]
    NoRegion,
}

/// Errors related to the external text recognizer.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The recognizer is not available (missing binary, bad install).
    #[error("recognizer unavailable: {0}")]
    Unavailable(String),

    /// Recognition over an image region failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image handed to the recognizer.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors related to DNI field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Too few fields parsed from the recognized text.
    #[error("insufficient data: {found} fields extracted, {required} required")]
    Insufficient { found: usize, required: usize },
}

impl LectorError {
    /// Stable machine-readable code distinguishing the failure categories.
    ///
    /// Callers use this to pick user guidance (retake the photo vs. service
    /// fault) without parsing error messages, which are not stable across
    /// versions.
    pub fn code(&self) -> &'static str {
        match self {
            LectorError::Decode(_) => "DECODE_ERROR",
            LectorError::Detection(DetectionError::NoRegion) => "DNI_NOT_DETECTED",
            LectorError::Extraction(ExtractionError::Insufficient { .. }) => "INSUFFICIENT_DATA",
            LectorError::Ocr(_) => "OCR_ERROR",
            LectorError::Io(_) => "FILE_NOT_FOUND",
            LectorError::Config(_) => "CONFIG_ERROR",
        }
    }
}

/// Result type for the lector library.
pub type Result<T> = std::result::Result<T, LectorError>;
