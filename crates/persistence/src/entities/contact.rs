//! Contact entity (database row mapping).

use sqlx::FromRow;

use domain::models::Contact;

/// Database row mapping for the contacts table.
#[derive(Debug, Clone, FromRow)]
pub struct ContactEntity {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<ContactEntity> for Contact {
    fn from(entity: ContactEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
        }
    }
}
