use std::sync::Arc;

use axum::http::StatusCode;
use thiserror::Error;

use super::authorizer::Authorizer;
use super::models::{Favorite, NewFavorite};
use crate::db::{DbError, FavoriteStore, InsertOutcome};
use crate::error::HttpError;
use crate::impl_into_response;
use crate::location::{LocationQuery, ValidationError};

/// Favorites a single owner may hold
pub const MAX_FAVORITES: usize = 5;

/// Longest city name the store accepts
const MAX_CITY_LEN: usize = 100;

#[derive(Error, Debug)]
pub enum FavoriteError {
    #[error("User not found")]
    UnknownUser,

    #[error("Only authorized users may add favorites")]
    Unauthorized,

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Favorite already exists")]
    DuplicateEntry,

    #[error("Maximum of {} favorites reached", MAX_FAVORITES)]
    CapacityExceeded,

    #[error("Favorite {0} not found")]
    NotFound(i64),

    #[error("Storage error: {0}")]
    PersistenceFailure(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
}

impl From<DbError> for FavoriteError {
    fn from(err: DbError) -> Self {
        Self::PersistenceFailure(err.to_string())
    }
}

impl HttpError for FavoriteError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownUser => StatusCode::UNAUTHORIZED,
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::Validation(_) | Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::DuplicateEntry | Self::CapacityExceeded => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PersistenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::UnknownUser => "UNKNOWN_USER",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::DuplicateEntry => "DUPLICATE_ENTRY",
            Self::CapacityExceeded => "CAPACITY_EXCEEDED",
            Self::NotFound(_) => "FAVORITE_NOT_FOUND",
            Self::PersistenceFailure(_) => "PERSISTENCE_FAILURE",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
        })
    }
}

impl_into_response!(FavoriteError);

impl FavoriteError {
    fn metric_outcome(&self) -> &'static str {
        match self {
            Self::UnknownUser => "unknown_user",
            Self::Unauthorized => "unauthorized",
            Self::Validation(_) | Self::InvalidArgument(_) => "invalid",
            Self::DuplicateEntry => "duplicate",
            Self::CapacityExceeded => "capacity_exceeded",
            Self::NotFound(_) => "not_found",
            Self::PersistenceFailure(_) => "persistence_failure",
        }
    }
}

/// Rule engine for per-owner favorite locations
pub struct FavoritesService {
    store: Arc<dyn FavoriteStore>,
    authorizer: Arc<dyn Authorizer>,
}

impl FavoritesService {
    pub fn new(store: Arc<dyn FavoriteStore>, authorizer: Arc<dyn Authorizer>) -> Self {
        Self { store, authorizer }
    }

    /// Add a favorite for `owner_id`.
    ///
    /// Checks run in a fixed order: owner, permission, input, duplicate,
    /// capacity. A duplicate is reported even when the owner is also at capacity.
    pub async fn add(
        &self,
        owner_id: &str,
        city: &str,
        country: &str,
    ) -> Result<Favorite, FavoriteError> {
        let result = self.try_add(owner_id, city, country).await;

        let outcome = match &result {
            Ok(_) => "added",
            Err(e) => e.metric_outcome(),
        };
        metrics::counter!("favorites_add_total", "outcome" => outcome).increment(1);

        result
    }

    async fn try_add(
        &self,
        owner_id: &str,
        city: &str,
        country: &str,
    ) -> Result<Favorite, FavoriteError> {
        if owner_id.is_empty() {
            return Err(FavoriteError::UnknownUser);
        }

        if !self
            .authorizer
            .has_favorite_write_permission(owner_id)
            .await?
        {
            tracing::warn!(owner_id = %owner_id, "Favorite write denied");
            return Err(FavoriteError::Unauthorized);
        }

        let query = LocationQuery::normalize(city, country)?;
        if query.city().chars().count() > MAX_CITY_LEN {
            return Err(ValidationError::new(format!(
                "city must be at most {} characters",
                MAX_CITY_LEN
            ))
            .into());
        }

        if self
            .store
            .exists_for(owner_id, query.city(), query.country_code())
            .await?
        {
            return Err(FavoriteError::DuplicateEntry);
        }

        if self.store.count_for(owner_id).await? >= MAX_FAVORITES {
            return Err(FavoriteError::CapacityExceeded);
        }

        let new = NewFavorite {
            owner_id: owner_id.to_string(),
            city: query.city().to_string(),
            country_code: query.country_code().to_string(),
        };

        // The store re-checks both rules; a concurrent writer may have won
        match self.store.insert(&new, MAX_FAVORITES).await? {
            InsertOutcome::Inserted(favorite) => {
                tracing::info!(
                    owner_id = %owner_id,
                    favorite_id = favorite.id,
                    city = %favorite.city,
                    country = %favorite.country_code,
                    "Favorite added"
                );
                Ok(favorite)
            }
            InsertOutcome::Duplicate => Err(FavoriteError::DuplicateEntry),
            InsertOutcome::LimitReached => Err(FavoriteError::CapacityExceeded),
        }
    }

    /// Delete one of the owner's favorites
    pub async fn remove(&self, owner_id: &str, id: i64) -> Result<(), FavoriteError> {
        if owner_id.is_empty() {
            return Err(FavoriteError::UnknownUser);
        }

        if !self.store.delete_for(owner_id, id).await? {
            return Err(FavoriteError::NotFound(id));
        }

        tracing::info!(owner_id = %owner_id, favorite_id = id, "Favorite removed");
        Ok(())
    }

    /// All of the owner's favorites, oldest first
    pub async fn list(&self, owner_id: &str) -> Result<Vec<Favorite>, FavoriteError> {
        if owner_id.is_empty() {
            return Err(FavoriteError::InvalidArgument("owner id must not be empty"));
        }

        Ok(self.store.list_for(owner_id).await?)
    }
}
