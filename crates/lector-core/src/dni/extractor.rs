//! Rule-driven DNI field extractor.

use chrono::{Local, NaiveDateTime};
use tracing::debug;

use crate::config::ExtractionConfig;
use crate::error::ExtractionError;

use super::rules::{
    calculate_age, extract_estado_civil, extract_fecha_nacimiento, extract_numero_documento,
    extract_prenombres, extract_primer_apellido, extract_segundo_apellido, extract_sexo,
    extract_tipo_documento,
};
use super::{DniData, Result};

/// Timestamp format of the ingestion field.
const INGRESO_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Extracts the DNI field set from a recognized-text corpus.
///
/// The corpus is upper-cased once, then each field runs its ordered rule
/// list with early exit; a field set by one pattern is never overwritten by
/// a later pattern. Extraction is deterministic given the corpus and the
/// clock instant.
pub struct DniExtractor {
    config: ExtractionConfig,
}

impl DniExtractor {
    /// Create an extractor with the given configuration.
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Extract fields using the current local time.
    pub fn extract(&self, corpus: &str) -> Result<DniData> {
        self.extract_at(corpus, Local::now().naive_local())
    }

    /// Extract fields against a pinned clock instant.
    ///
    /// The instant feeds the derived age and the ingestion timestamp;
    /// everything else depends only on the corpus.
    pub fn extract_at(&self, corpus: &str, now: NaiveDateTime) -> Result<DniData> {
        let text = corpus.to_uppercase();

        let mut data = DniData {
            fecha_hora_ingreso: now.format(INGRESO_FORMAT).to_string(),
            ..Default::default()
        };

        data.tipo_documento = extract_tipo_documento(&text);
        data.numero_documento = extract_numero_documento(&text);
        data.primer_apellido = extract_primer_apellido(&text);
        data.segundo_apellido = extract_segundo_apellido(&text);
        data.prenombres = extract_prenombres(&text);

        if let Some(birth) = extract_fecha_nacimiento(&text) {
            data.edad = Some(calculate_age(birth.date, now.date()));
            data.fecha_nacimiento = Some(birth.text);
        }

        data.sexo = extract_sexo(&text);
        data.estado_civil = extract_estado_civil(&text);

        let found = data.populated_fields();
        debug!("extracted {} fields from {} chars of corpus", found, corpus.len());

        if found < self.config.min_fields {
            return Err(ExtractionError::Insufficient {
                found,
                required: self.config.min_fields,
            });
        }

        Ok(data)
    }
}

impl Default for DniExtractor {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}
