//! DNI field extraction module.

mod extractor;
pub mod rules;

pub use extractor::DniExtractor;

use serde::{Deserialize, Serialize};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, crate::error::ExtractionError>;

/// Structured fields extracted from one DNI card.
///
/// Every field is independently optional except the ingestion timestamp.
/// Serialized keys follow the wire contract (`tipoDocumento`,
/// `numeroDocumento`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DniData {
    /// Document type tag, "DNI" when a type marker was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_documento: Option<String>,

    /// Eight-digit document number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero_documento: Option<String>,

    /// First (paternal) surname, title-cased.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primer_apellido: Option<String>,

    /// Second (maternal) surname, title-cased.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segundo_apellido: Option<String>,

    /// Given names, title-cased.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prenombres: Option<String>,

    /// Birth date in "DD MM YYYY" textual form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_nacimiento: Option<String>,

    /// Age derived from the birth date at extraction time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edad: Option<u32>,

    /// "MASCULINO" or "FEMENINO".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sexo: Option<String>,

    /// Marital status word as printed on the card.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado_civil: Option<String>,

    /// Ingestion timestamp, always present.
    pub fecha_hora_ingreso: String,
}

impl DniData {
    /// Number of populated fields, excluding the ingestion timestamp.
    pub fn populated_fields(&self) -> usize {
        [
            self.tipo_documento.is_some(),
            self.numero_documento.is_some(),
            self.primer_apellido.is_some(),
            self.segundo_apellido.is_some(),
            self.prenombres.is_some(),
            self.fecha_nacimiento.is_some(),
            self.edad.is_some(),
            self.sexo.is_some(),
            self.estado_civil.is_some(),
        ]
        .into_iter()
        .filter(|&set| set)
        .count()
    }
}
