//! Regex pattern tables for DNI field extraction.
//!
//! The corpus is upper-cased before matching, so all patterns are written
//! against uppercase text. Per-field pattern lists are ordered by priority;
//! the extractors take the first match and skip the rest.

use lazy_static::lazy_static;
use regex::Regex;

/// Marker substrings whose presence identifies the document type.
pub const DOC_TYPE_MARKERS: [&str; 3] = ["DOCUMENTO NACIONAL", "DNI", "IDENTIDAD"];

/// Marital status words, checked in this order; first hit wins.
pub const ESTADO_CIVIL_WORDS: [&str; 9] = [
    "SOLTERO",
    "SOLTERA",
    "CASADO",
    "CASADA",
    "VIUDO",
    "VIUDA",
    "DIVORCIADO",
    "DIVORCIADA",
    "CONVIVIENTE",
];

lazy_static! {
    // Exactly eight digits bounded by non-digits. The older `\d{8}-\d`
    // expectation is gone; the bare form is authoritative.
    pub static ref DOC_NUMBER: Regex =
        Regex::new(r"(?:\A|[^0-9])([0-9]{8})(?:[^0-9]|\z)").unwrap();

    // First surname label synonyms across card revisions.
    pub static ref PRIMER_APELLIDO: Vec<Regex> = vec![
        Regex::new(r"PRIMER\s+APELLIDO\s*:?\s*([A-ZÁÉÍÓÚÑ]+)").unwrap(),
        Regex::new(r"APELLIDO\s+PATERNO\s*:?\s*([A-ZÁÉÍÓÚÑ]+)").unwrap(),
        Regex::new(r"\bPATERNO\s*:?\s*([A-ZÁÉÍÓÚÑ]+)").unwrap(),
    ];

    // Second surname label synonyms.
    pub static ref SEGUNDO_APELLIDO: Vec<Regex> = vec![
        Regex::new(r"SEGUNDO\s+APELLIDO\s*:?\s*([A-ZÁÉÍÓÚÑ]+)").unwrap(),
        Regex::new(r"APELLIDO\s+MATERNO\s*:?\s*([A-ZÁÉÍÓÚÑ]+)").unwrap(),
        Regex::new(r"\bMATERNO\s*:?\s*([A-ZÁÉÍÓÚÑ]+)").unwrap(),
    ];

    // Given names; the capture may leak adjacent labels, cleaned up with
    // PRENOMBRES_CLEANUP before acceptance.
    pub static ref PRENOMBRES: Vec<Regex> = vec![
        Regex::new(r"PRENOMBRES\s*:?\s*([A-ZÁÉÍÓÚÑ ]+)").unwrap(),
        Regex::new(r"PRE\s+NOMBRES\s*:?\s*([A-ZÁÉÍÓÚÑ ]+)").unwrap(),
        Regex::new(r"\bNOMBRES\s*:?\s*([A-ZÁÉÍÓÚÑ ]+)").unwrap(),
    ];

    // Label keywords accidentally captured by the letter/space class of
    // PRENOMBRES; the cleanup cuts from the first leaked keyword to the
    // end of the capture.
    pub static ref PRENOMBRES_CLEANUP: Regex =
        Regex::new(r"\b(?:FECHA|NACIMIENTO|SEXO|ESTADO|CIVIL)\b.*\z").unwrap();

    // Birth date: delimiter-flexible first, then strict space-separated.
    // Bounded by non-digits like DOC_NUMBER, so a longer digit run cannot
    // shed its ends into a spurious date.
    pub static ref BIRTH_DATE: Vec<Regex> = vec![
        Regex::new(r"(?:\A|[^0-9])([0-9]{2})[\s./-]([0-9]{2})[\s./-]([0-9]{4})(?:[^0-9]|\z)")
            .unwrap(),
        Regex::new(r"(?:\A|[^0-9])([0-9]{2}) ([0-9]{2}) ([0-9]{4})(?:[^0-9]|\z)").unwrap(),
    ];

    // Sex label followed by the full word or single letter. Full words come
    // first so "MASCULINO" is not consumed as a bare "M".
    pub static ref SEXO: Regex =
        Regex::new(r"SEXO\s*:?\s*(MASCULINO|FEMENINO|M|F)\b").unwrap();

    // One word-boundary regex per status word, in priority order.
    pub static ref ESTADO_CIVIL: Vec<(Regex, &'static str)> = ESTADO_CIVIL_WORDS
        .iter()
        .map(|word| (Regex::new(&format!(r"\b{word}\b")).unwrap(), *word))
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_number_requires_exactly_eight_digits() {
        assert_eq!(&DOC_NUMBER.captures("DNI 12345678 LIMA").unwrap()[1], "12345678");
        assert_eq!(&DOC_NUMBER.captures("12345678").unwrap()[1], "12345678");
        assert!(DOC_NUMBER.captures("123456789").is_none());
        assert!(DOC_NUMBER.captures("1234567").is_none());
    }

    #[test]
    fn test_surname_patterns_capture_single_word() {
        let caps = PRIMER_APELLIDO[0]
            .captures("PRIMER APELLIDO GARCIA SEGUNDO APELLIDO LOPEZ")
            .unwrap();
        assert_eq!(&caps[1], "GARCIA");
    }

    #[test]
    fn test_sexo_prefers_full_word() {
        assert_eq!(&SEXO.captures("SEXO MASCULINO").unwrap()[1], "MASCULINO");
        assert_eq!(&SEXO.captures("SEXO M").unwrap()[1], "M");
        assert_eq!(&SEXO.captures("SEXO F 12").unwrap()[1], "F");
    }

    #[test]
    fn test_prenombres_cleanup_cuts_from_first_leaked_label() {
        let cleaned = PRENOMBRES_CLEANUP.replace("JUAN CARLOS FECHA DE NACIMIENTO", "");
        assert_eq!(cleaned.trim(), "JUAN CARLOS");

        let cleaned = PRENOMBRES_CLEANUP.replace("MARIA SEXO F", "");
        assert_eq!(cleaned.trim(), "MARIA");
    }
}
