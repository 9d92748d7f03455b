//! Repository implementations for database operations.

pub mod contact;
pub mod memory;
pub mod store;

pub use contact::ContactRepository;
pub use memory::MemoryContactStore;
pub use store::ContactStore;
