//! Form definitions backing the dashboard routes.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod auth;
pub mod inspections;
pub mod master;
pub mod volunteers;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
///
/// Messages are shown to staff as they are.
pub enum FormError {
    #[error("Please fill in all required fields")]
    Validation(#[from] ValidationErrors),

    #[error("Please fill in all required fields")]
    MissingRequired,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Please enter your phone number.")]
    MissingPhone,

    #[error("Invalid email address.")]
    InvalidEmail,

    #[error("Tree name and scientific name are required")]
    MissingTreeFields,

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Unknown inspection status: {0}")]
    InvalidStatus(String),

    #[error("Please upload only JPEG, PNG, or PDF files")]
    InvalidFileType,

    #[error("Please upload a file smaller than 5MB")]
    FileTooLarge,

    #[error("Failed to parse the CSV file: {0}")]
    Csv(String),

    #[error("Failed to parse the form")]
    Malformed,
}

impl From<TypeConstraintError> for FormError {
    fn from(err: TypeConstraintError) -> Self {
        match err {
            TypeConstraintError::InvalidEmail => FormError::InvalidEmail,
            _ => FormError::MissingRequired,
        }
    }
}

/// Trims a submitted value, mapping blanks to `None`.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(crate) fn parse_optional_number(value: Option<&str>) -> Result<Option<u32>, FormError> {
    non_blank(value)
        .map(|raw| raw.parse().map_err(|_| FormError::InvalidNumber(raw)))
        .transpose()
}

pub(crate) fn parse_optional_date(
    value: Option<&str>,
) -> Result<Option<chrono::NaiveDate>, FormError> {
    non_blank(value)
        .map(|raw| {
            chrono::NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|_| FormError::InvalidDate(raw))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_absent() {
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(Some(" x ")), Some("x".to_string()));
        assert_eq!(parse_optional_number(Some("")).unwrap(), None);
        assert_eq!(parse_optional_number(Some(" 12 ")).unwrap(), Some(12));
        assert!(matches!(
            parse_optional_number(Some("twelve")),
            Err(FormError::InvalidNumber(_))
        ));
        assert!(parse_optional_date(Some("2025-13-01")).is_err());
    }
}
