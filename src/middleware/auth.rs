use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorResponse;
use crate::extractors::CurrentUser;
use crate::AppState;

/// Middleware that resolves `Authorization: Bearer <token>` to a user
///
/// On success the user's id is stored as a `CurrentUser` request extension.
/// Missing or unknown tokens are answered with 401.
pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let Some(token) = token else {
        tracing::warn!("Missing bearer token");
        return unauthorized(
            "Bearer token required. Provide an Authorization header.",
            "MISSING_TOKEN",
        );
    };

    match state.users.find_by_token(token).await {
        Ok(Some(user)) => {
            tracing::debug!(user_id = %user.id, "Caller authenticated");
            request.extensions_mut().insert(CurrentUser(user.id));
            next.run(request).await
        }
        Ok(None) => {
            tracing::warn!("Unknown bearer token");
            unauthorized("Invalid bearer token", "INVALID_TOKEN")
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to resolve bearer token");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_code(
                    "Failed to resolve caller",
                    "PERSISTENCE_FAILURE",
                )),
            )
                .into_response()
        }
    }
}

fn unauthorized(message: &str, code: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::with_code(message, code)),
    )
        .into_response()
}
