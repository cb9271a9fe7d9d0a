use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::AppError;

use super::client::SubmissionClient;
use super::domain::{AttendanceForm, Form, Grade, SignupForm};
use super::service::{FormsService, FormsServiceError};
use super::state::{FormState, FormStateError};

/// Router builder exposing the relay endpoints the site's forms post to.
pub fn forms_router<C>(service: Arc<FormsService<C>>) -> Router
where
    C: SubmissionClient + 'static,
{
    Router::new()
        .route("/api/signup", post(submit_handler::<SignupForm, C>))
        .route("/api/attendance", post(submit_handler::<AttendanceForm, C>))
        .route("/api/grades", get(grades_handler))
        .with_state(service)
}

pub(crate) async fn submit_handler<F, C>(
    State(service): State<Arc<FormsService<C>>>,
    body: Result<Json<F>, JsonRejection>,
) -> Response
where
    F: Form + DeserializeOwned,
    C: SubmissionClient + 'static,
{
    let values = match body {
        Ok(Json(values)) => values,
        Err(rejection) => {
            tracing::warn!(
                destination = %F::DESTINATION,
                status = rejection.status().as_u16(),
                "rejected unreadable form body"
            );
            return AppError::from(rejection).into_response();
        }
    };

    let mut state = FormState::from_values(values);
    match service.submit(&mut state).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(FormsServiceError::State(FormStateError::Invalid(errors))) => {
            let payload = json!({
                "success": false,
                "errors": errors,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(FormsServiceError::Submission(error)) => {
            let payload = json!({
                "success": false,
                "error": error.public_message(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
        Err(other) => {
            tracing::error!(error = %other, "form submission could not start");
            let payload = json!({
                "success": false,
                "error": "Server error",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn grades_handler() -> Json<Vec<&'static str>> {
    Json(Grade::ALL.iter().map(|grade| grade.label()).collect())
}
