//! Rule-based field extractors for the Peruvian DNI.
//!
//! Each field owns a small ordered pattern list evaluated with early exit:
//! the first pattern that matches the corpus determines the value and the
//! remaining patterns for that field are skipped. This tolerates label
//! variation across card revisions without a unified grammar.

pub mod civil;
pub mod dates;
pub mod document;
pub mod names;
pub mod patterns;

pub use civil::{extract_estado_civil, extract_sexo};
pub use dates::{calculate_age, extract_fecha_nacimiento};
pub use document::{extract_numero_documento, extract_tipo_documento};
pub use names::{extract_prenombres, extract_primer_apellido, extract_segundo_apellido};

/// Title-case a single uppercase word ("GARCIA" -> "Garcia").
pub(crate) fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Title-case every whitespace-separated word.
pub(crate) fn title_case_words(text: &str) -> String {
    text.split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}
