use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use lingopress_shared::ContentError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: u16,
}

/// Wrapper mapping pipeline errors onto HTTP statuses. Store failures
/// surface with a generic message; the cause is logged where it occurs.
pub struct ApiError(ContentError);

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ContentError::Validation(_) | ContentError::Invariant(_) => {
                (StatusCode::BAD_REQUEST, self.0.to_string())
            },
            ContentError::NotFound { .. } => (StatusCode::NOT_FOUND, self.0.to_string()),
            ContentError::Conflict { .. } => (StatusCode::CONFLICT, self.0.to_string()),
            ContentError::Store(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "failed to save changes".to_string())
            },
        };
        let body = Json(ErrorResponse {
            message,
            code: status.as_u16(),
        });
        (status, body).into_response()
    }
}
