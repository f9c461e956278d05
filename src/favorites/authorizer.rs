use std::sync::Arc;

use async_trait::async_trait;

use crate::db::{DbError, UserRepository};

/// Decides whether an owner may create favorites
#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn has_favorite_write_permission(&self, owner_id: &str) -> Result<bool, DbError>;
}

/// Grants the write capability to users whose role is in a configured list
pub struct RoleAuthorizer {
    users: Arc<dyn UserRepository>,
    writer_roles: Vec<String>,
}

impl RoleAuthorizer {
    pub fn new(users: Arc<dyn UserRepository>, writer_roles: Vec<String>) -> Self {
        Self {
            users,
            writer_roles: writer_roles
                .into_iter()
                .map(|r| r.trim().to_lowercase())
                .filter(|r| !r.is_empty())
                .collect(),
        }
    }
}

#[async_trait]
impl Authorizer for RoleAuthorizer {
    async fn has_favorite_write_permission(&self, owner_id: &str) -> Result<bool, DbError> {
        let Some(user) = self.users.get(owner_id).await? else {
            tracing::debug!(owner_id = %owner_id, "Unknown owner has no write permission");
            return Ok(false);
        };

        let role = user.role.trim().to_lowercase();
        Ok(self.writer_roles.iter().any(|r| *r == role))
    }
}
