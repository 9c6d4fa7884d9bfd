//! Row shapes exchanged with the hosted backend and runtime configuration.

use chrono::NaiveDate;

use crate::domain::types::TypeConstraintError;

pub mod admin;
#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod config;
pub mod inspection;
pub mod tree;
pub mod volunteer;

/// Parses a `date` column, accepting timestamp strings by their date part.
pub fn parse_date(value: &str) -> Result<NaiveDate, TypeConstraintError> {
    let value = value.trim();
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| TypeConstraintError::InvalidValue(format!("invalid date: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_timestamp_dates() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(parse_date("2025-03-09"), Ok(expected));
        assert_eq!(parse_date("2025-03-09T12:30:00+05:30"), Ok(expected));
        assert!(parse_date("09/03/2025").is_err());
        assert!(parse_date("").is_err());
    }
}
