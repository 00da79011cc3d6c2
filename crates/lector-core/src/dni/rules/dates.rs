//! Birth date extraction and age derivation.

use chrono::{Datelike, NaiveDate};

use super::patterns::BIRTH_DATE;

/// Birth date found in the corpus, normalized to "DD MM YYYY".
#[derive(Debug, Clone, PartialEq)]
pub struct BirthDate {
    /// Normalized textual form.
    pub text: String,
    /// Parsed calendar date.
    pub date: NaiveDate,
}

/// Extract the birth date from the corpus.
///
/// Patterns are tried in order (delimiter-flexible, then strict
/// space-separated); the first textual match is normalized to
/// "DD MM YYYY". A match that does not parse as a calendar date yields
/// `None` rather than failing the extraction.
pub fn extract_fecha_nacimiento(text: &str) -> Option<BirthDate> {
    let caps = BIRTH_DATE.iter().find_map(|p| p.captures(text))?;

    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    Some(BirthDate {
        text: format!("{:02} {:02} {:04}", day, month, year),
        date,
    })
}

/// Whole years between the birth date and `today`.
pub fn calculate_age(birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_extract_space_separated() {
        let birth = extract_fecha_nacimiento("FECHA DE NACIMIENTO 15 03 1990 SEXO M").unwrap();
        assert_eq!(birth.text, "15 03 1990");
        assert_eq!(birth.date, date(1990, 3, 15));
    }

    #[test]
    fn test_extract_delimiter_flexible() {
        let birth = extract_fecha_nacimiento("NACIMIENTO 15/03/1990").unwrap();
        assert_eq!(birth.text, "15 03 1990");

        let birth = extract_fecha_nacimiento("15-03-1990").unwrap();
        assert_eq!(birth.text, "15 03 1990");

        let birth = extract_fecha_nacimiento("15.03.1990").unwrap();
        assert_eq!(birth.text, "15 03 1990");
    }

    #[test]
    fn test_longer_digit_runs_are_not_dates() {
        // Must not shed the surrounding digits into "23 45 6789".
        assert!(extract_fecha_nacimiento("CODIGO 123 45 67890").is_none());
        assert!(extract_fecha_nacimiento("15 03 19905").is_none());
    }

    #[test]
    fn test_invalid_calendar_date_is_absent() {
        assert!(extract_fecha_nacimiento("FECHA 99 99 1990").is_none());
        assert!(extract_fecha_nacimiento("FECHA 31 02 1990").is_none());
        assert!(extract_fecha_nacimiento("SIN FECHA AQUI").is_none());
    }

    #[test]
    fn test_age_before_birthday_this_year() {
        // Birthday 15.03 not yet reached on 10.03: still 33.
        assert_eq!(calculate_age(date(1990, 3, 15), date(2024, 3, 10)), 33);
    }

    #[test]
    fn test_age_on_and_after_birthday() {
        assert_eq!(calculate_age(date(1990, 3, 15), date(2024, 3, 15)), 34);
        assert_eq!(calculate_age(date(1990, 3, 15), date(2024, 7, 1)), 34);
    }
}
