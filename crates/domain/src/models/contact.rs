//! Contact domain model.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use validator::Validate;

/// A single address-book entry.
///
/// `id` is assigned by the store on insert and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl Contact {
    pub fn new(id: i32, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} <{}>", self.id, self.name, self.email)
    }
}

/// Reasons a submitted contact form is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactFormError {
    #[error("Name and email are required")]
    MissingFields,

    #[error("Invalid email address format")]
    InvalidEmail,
}

/// Form payload for creating or editing a contact.
///
/// Missing fields deserialize as empty strings so that an incomplete form
/// is reported as a validation failure rather than a rejected request.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ContactForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name and email are required"))]
    pub name: String,

    #[serde(default)]
    #[validate(
        length(min = 1, message = "Name and email are required"),
        custom(function = "shared::validation::validate_email")
    )]
    pub email: String,
}

impl ContactForm {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Returns a copy with surrounding whitespace stripped from both fields.
    pub fn normalized(&self) -> Self {
        Self {
            name: shared::validation::normalize_field(&self.name),
            email: shared::validation::normalize_field(&self.email),
        }
    }

    /// Normalises and validates the form.
    ///
    /// Missing fields take precedence over a malformed email address.
    pub fn check(&self) -> Result<Self, ContactFormError> {
        let form = self.normalized();
        match form.validate() {
            Ok(()) => Ok(form),
            Err(errors) => {
                let missing = errors
                    .field_errors()
                    .values()
                    .flat_map(|errs| errs.iter())
                    .any(|e| e.code == "length");
                if missing {
                    Err(ContactFormError::MissingFields)
                } else {
                    Err(ContactFormError::InvalidEmail)
                }
            }
        }
    }
}
