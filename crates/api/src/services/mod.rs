//! Request-scoped helpers shared by route handlers.

pub mod flash;
