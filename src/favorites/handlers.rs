use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::models::{CreateFavoriteRequest, Favorite};
use super::service::FavoriteError;
use crate::extractors::CurrentUser;
use crate::AppState;

/// GET /favorites - The caller's favorites, oldest first
pub async fn list_favorites(
    State(state): State<AppState>,
    CurrentUser(owner_id): CurrentUser,
) -> Result<Json<Vec<Favorite>>, FavoriteError> {
    let favorites = state.favorites_service.list(&owner_id).await?;
    Ok(Json(favorites))
}

/// POST /favorites - Add a favorite location
pub async fn add_favorite(
    State(state): State<AppState>,
    CurrentUser(owner_id): CurrentUser,
    Json(request): Json<CreateFavoriteRequest>,
) -> Result<(StatusCode, Json<Favorite>), FavoriteError> {
    let favorite = state
        .favorites_service
        .add(&owner_id, &request.city, &request.country)
        .await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

/// DELETE /favorites/{id}
pub async fn delete_favorite(
    State(state): State<AppState>,
    CurrentUser(owner_id): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, FavoriteError> {
    state.favorites_service.remove(&owner_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
