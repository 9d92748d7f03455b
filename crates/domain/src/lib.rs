//! Domain layer for the contacts address book.
//!
//! This crate contains:
//! - The `Contact` model shared by every front-end
//! - Validated form input for creating and editing contacts

pub mod models;
