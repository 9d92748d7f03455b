//! Persistence layer for the contacts address book.
//!
//! This crate contains:
//! - Database connection management
//! - Schema initialization (embedded migrations)
//! - Entity definitions (database row mappings)
//! - The `ContactStore` contract with Postgres and in-memory implementations

pub mod db;
pub mod entities;
pub mod error;
pub mod metrics;
pub mod repositories;
pub mod schema;

pub use error::PersistenceError;
