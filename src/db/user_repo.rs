use async_trait::async_trait;
use sqlx::SqlitePool;

use super::DbError;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub api_token: String,
    /// Free-form role name, compared case-insensitively by authorizers
    pub role: String,
    pub created_at: i64,
}

/// Read access to users plus the upsert used by startup seeding
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Resolve a bearer token to its user
    async fn find_by_token(&self, token: &str) -> Result<Option<User>, DbError>;

    async fn get(&self, id: &str) -> Result<Option<User>, DbError>;

    /// Insert the user unless the id already exists. Returns `true` when inserted.
    async fn insert_if_absent(&self, user: &User) -> Result<bool, DbError>;
}

/// SQLite implementation of UserRepository
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: UserRow) -> User {
        User {
            id: row.id,
            display_name: row.display_name,
            api_token: row.api_token,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    display_name: String,
    api_token: String,
    role: String,
    created_at: i64,
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_token(&self, token: &str) -> Result<Option<User>, DbError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, display_name, api_token, role, created_at FROM users WHERE api_token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Self::row_to_user))
    }

    async fn get(&self, id: &str) -> Result<Option<User>, DbError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, display_name, api_token, role, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Self::row_to_user))
    }

    async fn insert_if_absent(&self, user: &User) -> Result<bool, DbError> {
        let result = sqlx::query(
            "INSERT INTO users (id, display_name, api_token, role, created_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(id) DO NOTHING",
        )
        .bind(&user.id)
        .bind(&user.display_name)
        .bind(&user.api_token)
        .bind(&user.role)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
