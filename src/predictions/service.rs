use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tracing::{info, instrument};

use super::{
    repository::PredictionRepository, Clock, FinishedMatch, Prediction, PredictionBook,
    PredictionError, PredictionSnapshot, PredictionStats, SportType, SystemClock,
};

/// Loads a user's book, applies one engine operation and stores the result.
///
/// Writes for the same user are serialized, so two settlements racing for
/// one match can't both score it.
pub struct PredictionService {
    repository: Arc<dyn PredictionRepository>,
    clock: Arc<dyn Clock>,
    user_mutexes: Arc<RwLock<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl PredictionService {
    pub fn new(repository: Arc<dyn PredictionRepository>) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(repository: Arc<dyn PredictionRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            user_mutexes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    #[instrument(skip(self))]
    pub async fn snapshot(&self, user_id: &str) -> Result<PredictionSnapshot, PredictionError> {
        Ok(self.load_book(user_id).await?.to_snapshot())
    }

    #[instrument(skip(self))]
    pub async fn get_prediction(
        &self,
        user_id: &str,
        match_id: &str,
    ) -> Result<Prediction, PredictionError> {
        self.load_book(user_id)
            .await?
            .get(match_id)
            .cloned()
            .ok_or_else(|| PredictionError::NotFound(match_id.to_string()))
    }

    /// Creates or updates a prediction and returns the stored record. A
    /// settled prediction comes back unchanged.
    #[instrument(skip(self))]
    pub async fn submit_prediction(
        &self,
        user_id: &str,
        match_id: &str,
        home_score: u32,
        away_score: u32,
        sport_type: Option<SportType>,
    ) -> Result<Prediction, PredictionError> {
        let prediction = self
            .with_book(user_id, |book| {
                let changed = book.add_or_update(match_id, home_score, away_score, sport_type);
                (book.get(match_id).cloned(), changed)
            })
            .await?;

        info!(user_id = %user_id, match_id = %match_id, "Prediction submitted");
        prediction.ok_or_else(|| PredictionError::NotFound(match_id.to_string()))
    }

    /// Returns whether anything was removed
    #[instrument(skip(self))]
    pub async fn remove_prediction(
        &self,
        user_id: &str,
        match_id: &str,
    ) -> Result<bool, PredictionError> {
        self.with_book(user_id, |book| {
            let removed = book.remove(match_id);
            (removed, removed)
        })
        .await
    }

    /// Settles one prediction. Already-settled predictions are returned as
    /// they are.
    #[instrument(skip(self))]
    pub async fn settle_prediction(
        &self,
        user_id: &str,
        match_id: &str,
        actual_home_score: u32,
        actual_away_score: u32,
        sport_type: Option<SportType>,
    ) -> Result<Prediction, PredictionError> {
        let (outcome, prediction) = self
            .with_book(user_id, |book| {
                let outcome =
                    book.settle(match_id, actual_home_score, actual_away_score, sport_type);
                ((outcome, book.get(match_id).cloned()), outcome.is_some())
            })
            .await?;

        if let Some(outcome) = outcome {
            info!(
                user_id = %user_id,
                match_id = %match_id,
                points = outcome.points,
                point_type = %outcome.kind,
                "Prediction settled"
            );
        }

        prediction.ok_or_else(|| PredictionError::NotFound(match_id.to_string()))
    }

    #[instrument(skip(self, matches), fields(match_count = matches.len()))]
    pub async fn settle_finished(
        &self,
        user_id: &str,
        matches: &[FinishedMatch],
    ) -> Result<(usize, PredictionStats), PredictionError> {
        let (settled, stats) = self
            .with_book(user_id, |book| {
                let settled = book.settle_finished(matches);
                ((settled, *book.stats()), settled > 0)
            })
            .await?;

        info!(user_id = %user_id, settled, "Finished matches settled");
        Ok((settled, stats))
    }

    #[instrument(skip(self))]
    pub async fn stats(&self, user_id: &str) -> Result<PredictionStats, PredictionError> {
        Ok(*self.load_book(user_id).await?.stats())
    }

    #[instrument(skip(self))]
    pub async fn history(
        &self,
        user_id: &str,
        sport: Option<SportType>,
    ) -> Result<Vec<Prediction>, PredictionError> {
        let book = self.load_book(user_id).await?;
        Ok(book.settled_history(sport).into_iter().cloned().collect())
    }

    /// Drops the user's whole book, settled history included
    #[instrument(skip(self))]
    pub async fn delete_book(&self, user_id: &str) -> Result<(), PredictionError> {
        let user_lock = self.user_lock(user_id).await;
        let result = {
            let _guard = user_lock.lock().await;
            self.repository.delete_snapshot(user_id).await
        };
        self.release_user_lock(user_id, user_lock).await;

        result?;
        info!(user_id = %user_id, "Prediction book deleted");
        Ok(())
    }

    async fn load_book(&self, user_id: &str) -> Result<PredictionBook, PredictionError> {
        let book = match self.repository.load_snapshot(user_id).await? {
            Some(snapshot) => PredictionBook::from_snapshot(snapshot),
            None => PredictionBook::new(),
        };
        Ok(book.with_clock(self.clock.clone()))
    }

    /// Runs `apply` under the user's lock; it returns a result and whether
    /// the book changed and must be saved.
    async fn with_book<T, F>(&self, user_id: &str, apply: F) -> Result<T, PredictionError>
    where
        F: FnOnce(&mut PredictionBook) -> (T, bool),
    {
        let user_lock = self.user_lock(user_id).await;
        let result = {
            let _guard = user_lock.lock().await;
            self.apply_to_book(user_id, apply).await
        };
        self.release_user_lock(user_id, user_lock).await;
        result
    }

    async fn apply_to_book<T, F>(&self, user_id: &str, apply: F) -> Result<T, PredictionError>
    where
        F: FnOnce(&mut PredictionBook) -> (T, bool),
    {
        let mut book = self.load_book(user_id).await?;
        let (result, changed) = apply(&mut book);

        if changed {
            self.repository
                .save_snapshot(user_id, &book.to_snapshot())
                .await?;
        }

        Ok(result)
    }

    async fn user_lock(&self, user_id: &str) -> Arc<AsyncMutex<()>> {
        {
            let guard = self.user_mutexes.read().await;
            if let Some(lock) = guard.get(user_id) {
                return lock.clone();
            }
        }

        let mut guard = self.user_mutexes.write().await;
        guard
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Forgets the user's lock once no other task holds or waits on it.
    /// Handles are only cloned under the map lock, so the count can't grow
    /// while we hold the write guard.
    async fn release_user_lock(&self, user_id: &str, user_lock: Arc<AsyncMutex<()>>) {
        let mut guard = self.user_mutexes.write().await;
        // the map's handle plus ours
        if Arc::strong_count(&user_lock) == 2 {
            guard.remove(user_id);
        }
    }
}
