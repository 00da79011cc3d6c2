//! Document type and number extraction.

use super::patterns::{DOC_NUMBER, DOC_TYPE_MARKERS};

/// Document type tag emitted when any marker substring is present.
const TIPO_DNI: &str = "DNI";

/// Detect the document-type marker and return the fixed type tag.
pub fn extract_tipo_documento(text: &str) -> Option<String> {
    DOC_TYPE_MARKERS
        .iter()
        .any(|marker| text.contains(marker))
        .then(|| TIPO_DNI.to_string())
}

/// First run of exactly eight digits bounded by non-digits.
pub fn extract_numero_documento(text: &str) -> Option<String> {
    DOC_NUMBER.captures(text).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tipo_from_any_marker() {
        assert_eq!(
            extract_tipo_documento("DOCUMENTO NACIONAL DE IDENTIDAD"),
            Some("DNI".to_string())
        );
        assert_eq!(extract_tipo_documento("REPUBLICA DEL PERU DNI"), Some("DNI".to_string()));
        assert_eq!(extract_tipo_documento("PASAPORTE"), None);
    }

    #[test]
    fn test_numero_takes_first_eight_digit_run() {
        assert_eq!(
            extract_numero_documento("DNI 46218573 OTRO 99887766"),
            Some("46218573".to_string())
        );
        assert_eq!(extract_numero_documento("NUMERO 462185734"), None);
    }
}
