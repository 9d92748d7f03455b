//! HTML contact list and its form handlers.
//!
//! Every mutation answers with a 303 redirect back to the list and reports
//! its outcome as a flash message, including store failures.

use axum::{
    extract::{Path, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{Html, IntoResponse, Response},
    Form,
};
use domain::models::ContactForm;
use persistence::PersistenceError;
use tracing::{error, info, warn};

use crate::app::AppState;
use crate::middleware::metrics::record_contact_operation;
use crate::services::flash::{Flash, FlashLevel};
use crate::views;

/// `GET /`
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut flash = Flash::from_headers(&headers);
    let had_cookie = !flash.is_empty();

    let contacts = match state.store.list_all().await {
        Ok(contacts) => contacts,
        Err(err) => {
            error!(error = %err, "Failed to load contacts");
            flash.push(
                FlashLevel::Error,
                format!("Error loading contacts: {}", describe(&err)),
            );
            Vec::new()
        }
    };

    let page = Html(views::render_index(&contacts, flash.messages()));
    if had_cookie {
        ([(SET_COOKIE, Flash::clear_cookie())], page).into_response()
    } else {
        page.into_response()
    }
}

/// `POST /add`
pub async fn add_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ContactForm>,
) -> Response {
    let mut flash = Flash::from_headers(&headers);

    let form = match form.check() {
        Ok(form) => form,
        Err(err) => {
            record_contact_operation("add", "invalid");
            flash.push(FlashLevel::Error, err.to_string());
            return flash.redirect("/");
        }
    };

    match state.store.insert(&form.name, &form.email).await {
        Ok(contact) => {
            info!(contact_id = contact.id, "Contact added");
            record_contact_operation("add", "success");
            flash.push(FlashLevel::Success, "Contact added");
        }
        Err(err) => {
            error!(error = %err, "Failed to add contact");
            record_contact_operation("add", "error");
            flash.push(
                FlashLevel::Error,
                format!("Error adding contact: {}", describe(&err)),
            );
        }
    }

    flash.redirect("/")
}

/// `POST /edit/:id`
pub async fn edit_contact(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    Form(form): Form<ContactForm>,
) -> Response {
    let mut flash = Flash::from_headers(&headers);

    let form = match form.check() {
        Ok(form) => form,
        Err(err) => {
            record_contact_operation("edit", "invalid");
            flash.push(FlashLevel::Error, err.to_string());
            return flash.redirect("/");
        }
    };

    match state.store.update(id, &form.name, &form.email).await {
        Ok(true) => {
            info!(contact_id = id, "Contact updated");
            record_contact_operation("edit", "success");
            flash.push(FlashLevel::Success, "Contact updated");
        }
        Ok(false) => {
            warn!(contact_id = id, "Update targeted unknown contact");
            record_contact_operation("edit", "not_found");
            flash.push(FlashLevel::Warning, "Contact not found");
        }
        Err(err) => {
            error!(contact_id = id, error = %err, "Failed to update contact");
            record_contact_operation("edit", "error");
            flash.push(
                FlashLevel::Error,
                format!("Error updating contact: {}", describe(&err)),
            );
        }
    }

    flash.redirect("/")
}

/// `POST /delete/:id`
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Response {
    let mut flash = Flash::from_headers(&headers);

    match state.store.delete(id).await {
        Ok(true) => {
            info!(contact_id = id, "Contact deleted");
            record_contact_operation("delete", "success");
            flash.push(FlashLevel::Success, "Contact deleted");
        }
        Ok(false) => {
            warn!(contact_id = id, "Delete targeted unknown contact");
            record_contact_operation("delete", "not_found");
            flash.push(FlashLevel::Warning, "Contact not found");
        }
        Err(err) => {
            error!(contact_id = id, error = %err, "Failed to delete contact");
            record_contact_operation("delete", "error");
            flash.push(
                FlashLevel::Error,
                format!("Error deleting contact: {}", describe(&err)),
            );
        }
    }

    flash.redirect("/")
}

/// User-facing summary of a store failure. Details stay in the logs.
fn describe(err: &PersistenceError) -> &'static str {
    if err.is_connection() {
        "database is unavailable"
    } else {
        "unexpected database error"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_connection_failure() {
        let err = PersistenceError::Connection(sqlx::Error::PoolTimedOut);
        assert_eq!(describe(&err), "database is unavailable");
    }

    #[test]
    fn test_describe_query_failure() {
        let err = PersistenceError::Query(sqlx::Error::RowNotFound);
        assert_eq!(describe(&err), "unexpected database error");
    }
}
