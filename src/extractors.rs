use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorResponse;

/// Id of the authenticated caller.
///
/// Placed into request extensions by `middleware::require_user`; handlers
/// outside that layer are rejected with 401.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser(pub String);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = CurrentUserRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(CurrentUserRejection)
    }
}

/// Rejection when no caller identity was resolved
#[derive(Debug)]
pub struct CurrentUserRejection;

impl IntoResponse for CurrentUserRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::with_code(
                "Authentication required",
                "UNAUTHENTICATED",
            )),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_reads_identity_from_extensions() {
        let mut request = Request::new(());
        request
            .extensions_mut()
            .insert(CurrentUser("alice".to_string()));
        let (mut parts, _) = request.into_parts();

        let user = CurrentUser::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(user, CurrentUser("alice".to_string()));
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthorized() {
        let (mut parts, _) = Request::new(()).into_parts();

        let rejection = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();

        assert_eq!(rejection.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
