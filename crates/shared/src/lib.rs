//! Shared utilities for the contacts workspace.
//!
//! This crate provides functionality used by every front-end:
//! - Email address pattern matching
//! - Input normalisation for form fields

pub mod validation;
