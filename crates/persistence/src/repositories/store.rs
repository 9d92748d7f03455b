//! The data-access contract shared by every front-end.

use async_trait::async_trait;
use domain::models::Contact;

use crate::error::PersistenceError;

/// Contact persistence operations.
///
/// Each operation is its own unit of work and commits before returning.
/// `update` and `delete` on an unknown id succeed without effect and
/// return `false`; callers must not treat that as an existence check.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Creates the backing schema if absent. Safe to call repeatedly.
    async fn ensure_schema(&self) -> Result<(), PersistenceError>;

    /// Cheap round trip used by health probes.
    async fn ping(&self) -> Result<(), PersistenceError>;

    /// All contacts, ascending by id.
    async fn list_all(&self) -> Result<Vec<Contact>, PersistenceError>;

    /// Inserts a contact and returns it with its assigned id.
    async fn insert(&self, name: &str, email: &str) -> Result<Contact, PersistenceError>;

    /// Overwrites name and email. Returns whether a row matched.
    async fn update(&self, id: i32, name: &str, email: &str) -> Result<bool, PersistenceError>;

    /// Removes a contact. Returns whether a row matched.
    async fn delete(&self, id: i32) -> Result<bool, PersistenceError>;
}
