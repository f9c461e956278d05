use chrono::Utc;
use uuid::Uuid;

use crate::config::SeedConfig;
use crate::db::{DbError, FavoriteStore, InsertOutcome, User, UserRepository};
use crate::favorites::service::MAX_FAVORITES;
use crate::favorites::NewFavorite;

pub const DEMO_USER_ID: &str = "superuser";
const DEMO_ROLE: &str = "superuser";
const DEMO_DISPLAY_NAME: &str = "Super User";
const DEMO_CITY: &str = "München";
const DEMO_COUNTRY: &str = "DE";

/// What a seeding run changed
#[derive(Debug, Default, PartialEq)]
pub struct SeedReport {
    pub created_user: bool,
    pub created_favorite: bool,
    /// Set only on the run that created the user with a generated token
    pub generated_token: Option<String>,
}

/// Create the demo account and its first favorite.
///
/// Safe to run on every start: existing rows are left alone.
pub async fn seed_demo_data(
    config: &SeedConfig,
    users: &dyn UserRepository,
    favorites: &dyn FavoriteStore,
) -> Result<SeedReport, DbError> {
    let mut report = SeedReport::default();

    let generated = config.api_token.is_none();
    let token = config
        .api_token
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let user = User {
        id: DEMO_USER_ID.to_string(),
        display_name: DEMO_DISPLAY_NAME.to_string(),
        api_token: token,
        role: DEMO_ROLE.to_string(),
        created_at: Utc::now().timestamp(),
    };

    if users.insert_if_absent(&user).await? {
        report.created_user = true;
        if generated {
            tracing::warn!(
                user_id = %user.id,
                api_token = %user.api_token,
                "Demo user created with a generated bearer token. Store it now, it is not shown again; set seed.api_token to choose one"
            );
            report.generated_token = Some(user.api_token.clone());
        } else {
            tracing::info!(user_id = %user.id, "Demo user created");
        }
    }

    if favorites.count_for(DEMO_USER_ID).await? == 0 {
        let new = NewFavorite {
            owner_id: DEMO_USER_ID.to_string(),
            city: DEMO_CITY.to_string(),
            country_code: DEMO_COUNTRY.to_string(),
        };
        if let InsertOutcome::Inserted(favorite) = favorites.insert(&new, MAX_FAVORITES).await? {
            tracing::info!(favorite_id = favorite.id, city = %favorite.city, "Demo favorite created");
            report.created_favorite = true;
        }
    }

    Ok(report)
}
