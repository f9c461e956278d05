use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::favorites::{Favorite, NewFavorite};

use super::DbError;

/// Result of a guarded insert
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted(Favorite),
    /// The owner already has this city/country pair
    Duplicate,
    /// The owner is at the favorite limit
    LimitReached,
}

/// Persistence for favorites, always scoped to one owner
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    async fn count_for(&self, owner_id: &str) -> Result<usize, DbError>;

    async fn exists_for(&self, owner_id: &str, city: &str, country_code: &str)
        -> Result<bool, DbError>;

    /// Insert unless the pair exists or the owner already holds `limit` rows.
    /// City and country are stored as given; callers pass normalized values.
    /// Both conditions are re-checked by the store in the same write.
    async fn insert(&self, favorite: &NewFavorite, limit: usize) -> Result<InsertOutcome, DbError>;

    /// Delete the owner's favorite. Returns `false` when nothing matched.
    async fn delete_for(&self, owner_id: &str, id: i64) -> Result<bool, DbError>;

    /// All favorites of the owner, ascending by id
    async fn list_for(&self, owner_id: &str) -> Result<Vec<Favorite>, DbError>;
}

/// SQLite implementation of FavoriteStore
pub struct SqliteFavoriteStore {
    pool: SqlitePool,
}

impl SqliteFavoriteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_favorite(row: FavoriteRow) -> Favorite {
        Favorite {
            id: row.id,
            owner_id: row.owner_id,
            city: row.city,
            country_code: row.country_code,
        }
    }

    fn is_unique_violation(err: &sqlx::Error) -> bool {
        matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
    }
}

#[derive(sqlx::FromRow)]
struct FavoriteRow {
    id: i64,
    owner_id: String,
    city: String,
    country_code: String,
}

#[async_trait]
impl FavoriteStore for SqliteFavoriteStore {
    async fn count_for(&self, owner_id: &str) -> Result<usize, DbError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM favorites WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.0 as usize)
    }

    async fn exists_for(
        &self,
        owner_id: &str,
        city: &str,
        country_code: &str,
    ) -> Result<bool, DbError> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM favorites WHERE owner_id = ? AND city = ? AND country_code = ?",
        )
        .bind(owner_id)
        .bind(city)
        .bind(country_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0 > 0)
    }

    async fn insert(&self, favorite: &NewFavorite, limit: usize) -> Result<InsertOutcome, DbError> {
        let country_code = &favorite.country_code;
        let now = chrono::Utc::now().timestamp();

        // Single statement, so the duplicate and limit checks hold against
        // concurrent writers; the UNIQUE index is the last line.
        let result = sqlx::query(
            "INSERT INTO favorites (owner_id, city, country_code, created_at)
             SELECT ?, ?, ?, ?
             WHERE NOT EXISTS (
                 SELECT 1 FROM favorites WHERE owner_id = ? AND city = ? AND country_code = ?
             )
             AND (SELECT COUNT(*) FROM favorites WHERE owner_id = ?) < ?",
        )
        .bind(&favorite.owner_id)
        .bind(&favorite.city)
        .bind(country_code)
        .bind(now)
        .bind(&favorite.owner_id)
        .bind(&favorite.city)
        .bind(country_code)
        .bind(&favorite.owner_id)
        .bind(limit as i64)
        .execute(&self.pool)
        .await;

        let result = match result {
            Ok(result) => result,
            Err(e) if Self::is_unique_violation(&e) => return Ok(InsertOutcome::Duplicate),
            Err(e) => return Err(e.into()),
        };

        if result.rows_affected() == 0 {
            let outcome = if self
                .exists_for(&favorite.owner_id, &favorite.city, country_code)
                .await?
            {
                InsertOutcome::Duplicate
            } else {
                InsertOutcome::LimitReached
            };
            return Ok(outcome);
        }

        Ok(InsertOutcome::Inserted(Favorite {
            id: result.last_insert_rowid(),
            owner_id: favorite.owner_id.clone(),
            city: favorite.city.clone(),
            country_code: country_code.clone(),
        }))
    }

    async fn delete_for(&self, owner_id: &str, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for(&self, owner_id: &str) -> Result<Vec<Favorite>, DbError> {
        let rows: Vec<FavoriteRow> = sqlx::query_as(
            "SELECT id, owner_id, city, country_code FROM favorites WHERE owner_id = ? ORDER BY id",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Self::row_to_favorite).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn new_favorite(owner: &str, city: &str, country: &str) -> NewFavorite {
        NewFavorite {
            owner_id: owner.to_string(),
            city: city.to_string(),
            country_code: country.to_string(),
        }
    }

    async fn insert_ok(store: &SqliteFavoriteStore, fav: NewFavorite) -> Favorite {
        match store.insert(&fav, 5).await.unwrap() {
            InsertOutcome::Inserted(f) => f,
            other => panic!("expected insert, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_in_id_order() {
        let store = SqliteFavoriteStore::new(test_pool().await);

        let first = insert_ok(&store, new_favorite("alice", "Berlin", "DE")).await;
        let second = insert_ok(&store, new_favorite("alice", "Paris", "FR")).await;
        insert_ok(&store, new_favorite("bob", "Rome", "IT")).await;

        let listed = store.list_for("alice").await.unwrap();
        assert_eq!(listed, vec![first.clone(), second.clone()]);
        assert!(first.id < second.id);
        assert_eq!(store.count_for("alice").await.unwrap(), 2);
        assert_eq!(store.count_for("bob").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_is_rejected_per_owner() {
        let store = SqliteFavoriteStore::new(test_pool().await);
        insert_ok(&store, new_favorite("alice", "Berlin", "DE")).await;

        assert!(store.exists_for("alice", "Berlin", "DE").await.unwrap());
        assert!(!store.exists_for("alice", "berlin", "DE").await.unwrap());
        assert!(!store.exists_for("bob", "Berlin", "DE").await.unwrap());

        let outcome = store
            .insert(&new_favorite("alice", "Berlin", "DE"), 5)
            .await
            .unwrap();
        assert_eq!(outcome, InsertOutcome::Duplicate);
    }

    #[tokio::test]
    async fn test_non_ascii_country_is_stored_verbatim() {
        let store = SqliteFavoriteStore::new(test_pool().await);

        let fav = insert_ok(&store, new_favorite("alice", "Wien", "ßA")).await;

        assert_eq!(fav.country_code, "ßA");
        assert!(store.exists_for("alice", "Wien", "ßA").await.unwrap());
        assert_eq!(store.list_for("alice").await.unwrap(), vec![fav]);
    }

    #[tokio::test]
    async fn test_insert_respects_limit() {
        let store = SqliteFavoriteStore::new(test_pool().await);
        for city in ["A", "B", "C", "D", "E"] {
            insert_ok(&store, new_favorite("alice", city, "DE")).await;
        }

        let outcome = store
            .insert(&new_favorite("alice", "F", "DE"), 5)
            .await
            .unwrap();
        assert_eq!(outcome, InsertOutcome::LimitReached);

        // Duplicate wins over the limit
        let outcome = store
            .insert(&new_favorite("alice", "A", "DE"), 5)
            .await
            .unwrap();
        assert_eq!(outcome, InsertOutcome::Duplicate);

        assert_eq!(store.count_for("alice").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_delete_is_scoped_to_owner() {
        let store = SqliteFavoriteStore::new(test_pool().await);
        let fav = insert_ok(&store, new_favorite("alice", "Berlin", "DE")).await;

        assert!(!store.delete_for("bob", fav.id).await.unwrap());
        assert_eq!(store.count_for("alice").await.unwrap(), 1);

        assert!(store.delete_for("alice", fav.id).await.unwrap());
        assert!(!store.delete_for("alice", fav.id).await.unwrap());
        assert!(store.list_for("alice").await.unwrap().is_empty());
    }
}
