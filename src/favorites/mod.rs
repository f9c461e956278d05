pub mod authorizer;
pub mod handlers;
pub mod models;
pub mod service;

pub use authorizer::{Authorizer, RoleAuthorizer};
pub use models::{CreateFavoriteRequest, Favorite, NewFavorite};
pub use service::FavoritesService;
