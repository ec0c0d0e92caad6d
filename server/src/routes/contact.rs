//! Contact form endpoints

use axum::{extract::State, http::StatusCode, Form, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use dermasense::contact::{ContactMessage, ContactStore};

use crate::error::{ApiError, ApiResult};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

impl ContactForm {
    fn into_message(self) -> ApiResult<ContactMessage> {
        Ok(ContactMessage::from_fields(self.name, self.email, self.message)?)
    }
}

fn store(state: &SharedState) -> ApiResult<&dyn ContactStore> {
    state
        .contacts
        .as_deref()
        .ok_or_else(|| ApiError::Unavailable("Database not available".to_string()))
}

async fn save(state: &SharedState, form: ContactForm) -> ApiResult<(StatusCode, Json<Value>)> {
    let contact = form.into_message()?;
    let store = store(state)?;

    store.insert(contact).await.map_err(|e| {
        error!("Contact storage failed: {}", e);
        ApiError::Internal("Database error".to_string())
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Message sent successfully!" })),
    ))
}

/// POST /contact - form fields `name`, `email`, `message`
pub async fn submit_form(
    State(state): State<SharedState>,
    Form(form): Form<ContactForm>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    save(&state, form).await
}

/// POST /api/contact - JSON body with the same fields
pub async fn submit_json(
    State(state): State<SharedState>,
    Json(form): Json<ContactForm>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    save(&state, form).await
}

/// GET /messages, GET /api/contact - every stored message
pub async fn list_messages(State(state): State<SharedState>) -> ApiResult<Json<Vec<ContactMessage>>> {
    let store = store(&state)?;
    let contacts = store.list_all().await.map_err(|e| {
        error!("Contact listing failed: {}", e);
        ApiError::Internal("Database error".to_string())
    })?;
    Ok(Json(contacts))
}
