//! Sex and marital status extraction.

use super::patterns::{ESTADO_CIVIL, SEXO};

/// Map the sex label value to one of the two fixed output tokens.
pub fn extract_sexo(text: &str) -> Option<String> {
    let caps = SEXO.captures(text)?;
    let value = match &caps[1] {
        "M" | "MASCULINO" => "MASCULINO",
        "F" | "FEMENINO" => "FEMENINO",
        _ => return None,
    };
    Some(value.to_string())
}

/// Presence-test the fixed status list in order; first hit wins.
pub fn extract_estado_civil(text: &str) -> Option<String> {
    ESTADO_CIVIL
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, word)| (*word).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sexo_single_letter() {
        assert_eq!(extract_sexo("SEXO F"), Some("FEMENINO".to_string()));
        assert_eq!(extract_sexo("SEXO M 15 03 1990"), Some("MASCULINO".to_string()));
    }

    #[test]
    fn test_sexo_full_word() {
        assert_eq!(extract_sexo("SEXO MASCULINO"), Some("MASCULINO".to_string()));
        assert_eq!(extract_sexo("SEXO FEMENINO"), Some("FEMENINO".to_string()));
    }

    #[test]
    fn test_sexo_absent_without_label() {
        assert_eq!(extract_sexo("FEMENINO"), None);
    }

    #[test]
    fn test_estado_civil_first_hit_wins() {
        assert_eq!(
            extract_estado_civil("ESTADO CIVIL SOLTERO"),
            Some("SOLTERO".to_string())
        );
        // List order decides when several status words appear.
        assert_eq!(
            extract_estado_civil("CASADO ANTES SOLTERO"),
            Some("SOLTERO".to_string())
        );
        assert_eq!(extract_estado_civil("SIN ESTADO"), None);
    }

    #[test]
    fn test_estado_civil_respects_word_boundaries() {
        assert_eq!(extract_estado_civil("SOLTERONA"), None);
        assert_eq!(
            extract_estado_civil("CONVIVIENTE"),
            Some("CONVIVIENTE".to_string())
        );
    }
}
