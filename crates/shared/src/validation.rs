//! Common validation utilities.

use validator::ValidationError;

lazy_static::lazy_static! {
    /// Simple `local@domain.tld` shape accepted by the front-ends.
    pub static ref EMAIL_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
}

/// Returns true when the address matches [`EMAIL_REGEX`].
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Validates the shape of an email address.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        let mut err = ValidationError::new("email_format");
        err.message = Some("Invalid email address format".into());
        Err(err)
    }
}

/// Normalises a free-text form field by trimming surrounding whitespace.
pub fn normalize_field(value: &str) -> String {
    value.trim().to_string()
}
