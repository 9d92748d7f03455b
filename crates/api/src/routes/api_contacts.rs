//! JSON contact endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{Contact, ContactForm};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_contact_operation;

/// `GET /api/v1/contacts`
pub async fn list_contacts(State(state): State<AppState>) -> Result<Json<Vec<Contact>>, ApiError> {
    let contacts = state.store.list_all().await?;
    Ok(Json(contacts))
}

/// `POST /api/v1/contacts`
pub async fn create_contact(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    let form = form.check().inspect_err(|_| {
        record_contact_operation("add", "invalid");
    })?;

    let contact = state
        .store
        .insert(&form.name, &form.email)
        .await
        .inspect_err(|_| record_contact_operation("add", "error"))?;

    info!(contact_id = contact.id, "Contact created via API");
    record_contact_operation("add", "success");
    Ok((StatusCode::CREATED, Json(contact)))
}

/// `PUT /api/v1/contacts/:id`
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(form): Json<ContactForm>,
) -> Result<Json<Contact>, ApiError> {
    let form = form.check().inspect_err(|_| {
        record_contact_operation("edit", "invalid");
    })?;

    let updated = state
        .store
        .update(id, &form.name, &form.email)
        .await
        .inspect_err(|_| record_contact_operation("edit", "error"))?;

    if !updated {
        record_contact_operation("edit", "not_found");
        return Err(ApiError::NotFound(format!("Contact {} not found", id)));
    }

    info!(contact_id = id, "Contact updated via API");
    record_contact_operation("edit", "success");
    Ok(Json(Contact::new(id, form.name, form.email)))
}

/// `DELETE /api/v1/contacts/:id`
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .store
        .delete(id)
        .await
        .inspect_err(|_| record_contact_operation("delete", "error"))?;

    if !deleted {
        record_contact_operation("delete", "not_found");
        return Err(ApiError::NotFound(format!("Contact {} not found", id)));
    }

    info!(contact_id = id, "Contact deleted via API");
    record_contact_operation("delete", "success");
    Ok(StatusCode::NO_CONTENT)
}
