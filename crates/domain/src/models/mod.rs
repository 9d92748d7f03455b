//! Domain models for the contacts address book.

pub mod contact;

pub use contact::{Contact, ContactForm, ContactFormError};
