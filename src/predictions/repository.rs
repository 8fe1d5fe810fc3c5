use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::{PredictionError, PredictionSnapshot};

/// Storage for per-user prediction books
#[async_trait]
pub trait PredictionRepository: Send + Sync {
    async fn load_snapshot(&self, user_id: &str)
        -> Result<Option<PredictionSnapshot>, PredictionError>;
    async fn save_snapshot(
        &self,
        user_id: &str,
        snapshot: &PredictionSnapshot,
    ) -> Result<(), PredictionError>;
    async fn delete_snapshot(&self, user_id: &str) -> Result<(), PredictionError>;
}

/// In-memory implementation for development and tests. Data is lost on
/// restart.
#[derive(Debug, Default)]
pub struct InMemoryPredictionRepository {
    books: Arc<RwLock<HashMap<String, PredictionSnapshot>>>,
}

impl InMemoryPredictionRepository {
    pub fn new() -> Self {
        Self {
            books: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn user_count(&self) -> usize {
        self.books.read().await.len()
    }
}

#[async_trait]
impl PredictionRepository for InMemoryPredictionRepository {
    #[instrument(skip(self))]
    async fn load_snapshot(
        &self,
        user_id: &str,
    ) -> Result<Option<PredictionSnapshot>, PredictionError> {
        let books = self.books.read().await;
        Ok(books.get(user_id).cloned())
    }

    #[instrument(skip(self, snapshot))]
    async fn save_snapshot(
        &self,
        user_id: &str,
        snapshot: &PredictionSnapshot,
    ) -> Result<(), PredictionError> {
        let mut books = self.books.write().await;
        books.insert(user_id.to_string(), snapshot.clone());
        debug!(
            user_id = %user_id,
            predictions = snapshot.predictions.len(),
            "Prediction book saved in memory"
        );
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_snapshot(&self, user_id: &str) -> Result<(), PredictionError> {
        let removed = self.books.write().await.remove(user_id).is_some();
        debug!(user_id = %user_id, removed, "Prediction book deleted from memory");
        Ok(())
    }
}

/// PostgreSQL implementation. Each user's book is one row holding the JSON
/// snapshot.
pub struct PostgresPredictionRepository {
    pool: PgPool,
}

impl PostgresPredictionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), PredictionError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS prediction_books (user_id TEXT PRIMARY KEY, snapshot TEXT NOT NULL, updated_at TIMESTAMPTZ NOT NULL)"
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create prediction_books table");
            PredictionError::Repository(e.to_string())
        })?;
        Ok(())
    }
}

#[async_trait]
impl PredictionRepository for PostgresPredictionRepository {
    #[instrument(skip(self))]
    async fn load_snapshot(
        &self,
        user_id: &str,
    ) -> Result<Option<PredictionSnapshot>, PredictionError> {
        debug!(user_id = %user_id, "Fetching prediction book from database");

        let row = sqlx::query("SELECT snapshot FROM prediction_books WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, user_id = %user_id, "Failed to fetch prediction book");
                PredictionError::Repository(e.to_string())
            })?;

        match row {
            Some(row) => {
                let json: String = row.get("snapshot");
                Ok(Some(serde_json::from_str(&json)?))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, snapshot))]
    async fn save_snapshot(
        &self,
        user_id: &str,
        snapshot: &PredictionSnapshot,
    ) -> Result<(), PredictionError> {
        let json = serde_json::to_string(snapshot)?;

        sqlx::query(
            "INSERT INTO prediction_books (user_id, snapshot, updated_at) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id) DO UPDATE SET snapshot = EXCLUDED.snapshot, updated_at = EXCLUDED.updated_at"
        )
        .bind(user_id)
        .bind(json)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = %user_id, "Failed to save prediction book");
            PredictionError::Repository(e.to_string())
        })?;

        debug!(user_id = %user_id, "Prediction book saved to database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_snapshot(&self, user_id: &str) -> Result<(), PredictionError> {
        sqlx::query("DELETE FROM prediction_books WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, user_id = %user_id, "Failed to delete prediction book");
                PredictionError::Repository(e.to_string())
            })?;

        debug!(user_id = %user_id, "Prediction book deleted from database");
        Ok(())
    }
}
