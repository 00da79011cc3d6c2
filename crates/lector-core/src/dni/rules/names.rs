//! Surname and given-name extraction.

use regex::Regex;

use super::patterns::{PRENOMBRES, PRENOMBRES_CLEANUP, PRIMER_APELLIDO, SEGUNDO_APELLIDO};
use super::{title_case_word, title_case_words};

/// Run an ordered pattern list, keeping the first capture.
fn first_capture<'t>(patterns: &[Regex], text: &'t str) -> Option<&'t str> {
    patterns
        .iter()
        .find_map(|p| p.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// First (paternal) surname, title-cased.
pub fn extract_primer_apellido(text: &str) -> Option<String> {
    first_capture(&PRIMER_APELLIDO, text).map(title_case_word)
}

/// Second (maternal) surname, title-cased.
pub fn extract_segundo_apellido(text: &str) -> Option<String> {
    first_capture(&SEGUNDO_APELLIDO, text).map(title_case_word)
}

/// Given names, with trailing label leakage stripped, title-cased.
pub fn extract_prenombres(text: &str) -> Option<String> {
    let raw = first_capture(&PRENOMBRES, text)?;
    let cleaned = PRENOMBRES_CLEANUP.replace(raw, "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return None;
    }
    Some(title_case_words(cleaned))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_pattern_wins_over_later_synonyms() {
        let text = "PRIMER APELLIDO GARCIA PATERNO LOPEZ";
        assert_eq!(extract_primer_apellido(text), Some("Garcia".to_string()));
    }

    #[test]
    fn test_synonym_fallback() {
        assert_eq!(
            extract_primer_apellido("APELLIDO PATERNO QUISPE"),
            Some("Quispe".to_string())
        );
        assert_eq!(
            extract_primer_apellido("PATERNO HUAMAN"),
            Some("Huaman".to_string())
        );
        assert_eq!(
            extract_segundo_apellido("APELLIDO MATERNO FLORES"),
            Some("Flores".to_string())
        );
    }

    #[test]
    fn test_prenombres_strips_leaked_labels() {
        let text = "PRENOMBRES JUAN CARLOS FECHA DE NACIMIENTO 15 03 1990";
        assert_eq!(extract_prenombres(text), Some("Juan Carlos".to_string()));
    }

    #[test]
    fn test_prenombres_all_leak_yields_none() {
        assert_eq!(extract_prenombres("PRENOMBRES FECHA NACIMIENTO"), None);
    }

    #[test]
    fn test_accented_names() {
        assert_eq!(
            extract_primer_apellido("PRIMER APELLIDO ÑAUPARI"),
            Some("Ñaupari".to_string())
        );
        assert_eq!(
            extract_prenombres("PRENOMBRES MARÍA JOSÉ SEXO F"),
            Some("María José".to_string())
        );
    }
}
