use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored favorite location
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Favorite {
    pub id: i64,
    #[serde(skip)]
    pub owner_id: String,
    pub city: String,
    /// ISO 3166 alpha-2, uppercase
    pub country_code: String,
}

/// A favorite that passed validation and is about to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewFavorite {
    pub owner_id: String,
    pub city: String,
    pub country_code: String,
}

/// Request body for POST /favorites
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFavoriteRequest {
    /// City name, e.g. "Berlin"
    pub city: String,
    /// Country code; letters beyond the first two are dropped
    pub country: String,
}
