pub mod api_contacts;
pub mod contacts;
pub mod health;
