//! In-process contact store.
//!
//! Mirrors the Postgres repository semantics (ascending ids that are never
//! reused, silent no-ops on unknown ids) without a database. Used to drive
//! the front-ends in tests and demos.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use domain::models::Contact;

use crate::error::PersistenceError;
use crate::repositories::store::ContactStore;

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i32,
    contacts: BTreeMap<i32, Contact>,
}

/// Contact store backed by an ordered map.
#[derive(Debug, Default)]
pub struct MemoryContactStore {
    state: Mutex<MemoryState>,
    unavailable: AtomicBool,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates an outage: while set, every operation fails with a
    /// connection error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>, PersistenceError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(PersistenceError::connection(sqlx::Error::PoolClosed));
        }
        Ok(self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn ensure_schema(&self) -> Result<(), PersistenceError> {
        self.state().map(|_| ())
    }

    async fn ping(&self) -> Result<(), PersistenceError> {
        self.state().map(|_| ())
    }

    async fn list_all(&self) -> Result<Vec<Contact>, PersistenceError> {
        let state = self.state()?;
        Ok(state.contacts.values().cloned().collect())
    }

    async fn insert(&self, name: &str, email: &str) -> Result<Contact, PersistenceError> {
        let mut state = self.state()?;
        state.last_id += 1;
        let contact = Contact::new(state.last_id, name, email);
        state.contacts.insert(contact.id, contact.clone());
        Ok(contact)
    }

    async fn update(&self, id: i32, name: &str, email: &str) -> Result<bool, PersistenceError> {
        let mut state = self.state()?;
        match state.contacts.get_mut(&id) {
            Some(contact) => {
                contact.name = name.to_string();
                contact.email = email.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, PersistenceError> {
        let mut state = self.state()?;
        Ok(state.contacts.remove(&id).is_some())
    }
}
