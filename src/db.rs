use chrono::{DateTime, Utc};
use sqlx::AnyPool;

use crate::types::Paste;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS pastes (
    id TEXT PRIMARY KEY NOT NULL,
    content TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    expires_at TIMESTAMP,
    remaining_views INTEGER,
    is_deleted BOOLEAN NOT NULL DEFAULT FALSE
)";

#[derive(Clone)]
pub struct Database {
    pool: AnyPool,
}

impl Database {
    /// Connect to a database by URL.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            pool: AnyPool::connect(url).await?,
        })
    }

    /// Create the pastes table if it does not exist yet.
    pub async fn migrate(&mut self) -> anyhow::Result<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query(SCHEMA).execute(&mut conn).await?;
        Ok(())
    }

    /// Get a paste row by id, tombstoned or not.
    pub async fn get_paste(&mut self, id: &str) -> crate::ApiResult<Paste> {
        let mut conn = self.pool.acquire().await?;
        let paste = sqlx::query_as::<_, Paste>(
            "SELECT id, content, created_at, expires_at, remaining_views, is_deleted FROM pastes \
             WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&mut conn)
        .await?;
        Ok(paste)
    }

    /// Insert a paste.
    ///
    /// The row handed back is assembled from the arguments; the insert itself
    /// is driven to completion first, so it is visible to any later read.
    pub async fn insert_paste(
        &mut self,
        id: &str,
        content: &str,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        remaining_views: Option<i64>,
    ) -> crate::ApiResult<Paste> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query(
            "INSERT INTO pastes (id, content, created_at, expires_at, remaining_views, \
             is_deleted) VALUES (?, ?, ?, ?, ?, FALSE)",
        )
        .bind(id)
        .bind(content)
        .bind(created_at)
        .bind(expires_at)
        .bind(remaining_views)
        .execute(&mut conn)
        .await?;

        Ok(Paste {
            id: id.to_owned(),
            content: content.to_owned(),
            created_at,
            expires_at,
            remaining_views,
            is_deleted: false,
        })
    }

    /// Tombstone a paste. Safe to repeat; the flag never flips back.
    pub async fn tombstone_paste(&mut self, id: &str) -> crate::ApiResult<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("UPDATE pastes SET is_deleted = TRUE WHERE id = ?")
            .bind(id)
            .execute(&mut conn)
            .await?;
        Ok(())
    }

    /// Spend one view of a paste's budget.
    ///
    /// The decrement is a single guarded UPDATE, so concurrent fetches can
    /// never spend more views than the budget holds. The view that reaches
    /// zero tombstones the row in the same statement. Returns `None` when no
    /// live row with budget left matched, i.e. another fetch got there first.
    pub async fn consume_view(&mut self, id: &str) -> crate::ApiResult<Option<Paste>> {
        let mut conn = self.pool.acquire().await?;
        // fetch_all drains the statement, so the decrement and any tombstone
        // it sets are durable by the time the row comes back
        let mut rows = sqlx::query_as::<_, Paste>(
            "UPDATE pastes SET remaining_views = remaining_views - 1, is_deleted = \
             (remaining_views <= 1) WHERE id = ? AND is_deleted = FALSE AND remaining_views IS \
             NOT NULL AND remaining_views > 0 RETURNING id, content, created_at, expires_at, \
             remaining_views, is_deleted",
        )
        .bind(id)
        .fetch_all(&mut conn)
        .await?;
        Ok(rows.pop())
    }

    /// Hard-delete tombstoned rows and rows whose deadline has passed.
    ///
    /// Only the offline purge command calls this; request handling soft-deletes.
    pub async fn purge_expired(&mut self, now: DateTime<Utc>) -> crate::ApiResult<u64> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query(
            "DELETE FROM pastes WHERE is_deleted = TRUE OR (expires_at IS NOT NULL AND \
             expires_at <= ?)",
        )
        .bind(now)
        .execute(&mut conn)
        .await?;
        Ok(result.rows_affected())
    }
}
