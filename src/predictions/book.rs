use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    calculators::calculate_points, Clock, FinishedMatch, Prediction, PredictionStats,
    ScoreOutcome, SportType, SystemClock,
};

/// Persisted form of a [`PredictionBook`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionSnapshot {
    pub predictions: Vec<Prediction>,
    #[serde(default)]
    pub stats: PredictionStats,
}

/// One user's predictions plus the stats derived from them.
///
/// Each prediction moves `unsettled -> settled` exactly once. Every operation
/// that cannot apply (unknown match, already settled) is a silent no-op so
/// replayed events are harmless; the return values only report whether
/// anything changed.
pub struct PredictionBook {
    predictions: Vec<Prediction>,
    stats: PredictionStats,
    clock: Arc<dyn Clock>,
}

impl Default for PredictionBook {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionBook {
    pub fn new() -> Self {
        Self {
            predictions: Vec::new(),
            stats: PredictionStats::default(),
            clock: Arc::new(SystemClock::new()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Restores a book. Stats are rebuilt from the predictions and duplicate
    /// match ids collapse to the first entry.
    pub fn from_snapshot(snapshot: PredictionSnapshot) -> Self {
        let mut seen = HashSet::new();
        let predictions: Vec<Prediction> = snapshot
            .predictions
            .into_iter()
            .filter(|p| seen.insert(p.match_id.clone()))
            .collect();

        let mut book = Self {
            predictions,
            ..Self::new()
        };
        book.recalculate_stats();
        book
    }

    pub fn to_snapshot(&self) -> PredictionSnapshot {
        PredictionSnapshot {
            predictions: self.predictions.clone(),
            stats: self.stats,
        }
    }

    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    pub fn stats(&self) -> &PredictionStats {
        &self.stats
    }

    pub fn get(&self, match_id: &str) -> Option<&Prediction> {
        self.predictions.iter().find(|p| p.match_id == match_id)
    }

    pub fn has(&self, match_id: &str) -> bool {
        self.get(match_id).is_some()
    }

    /// Creates the prediction, or overwrites the score of an unsettled one.
    /// The sport is only recorded on creation.
    pub fn add_or_update(
        &mut self,
        match_id: &str,
        home_score: u32,
        away_score: u32,
        sport_type: Option<SportType>,
    ) -> bool {
        let now = self.clock.now();

        match self.predictions.iter_mut().find(|p| p.match_id == match_id) {
            Some(existing) if existing.settled => {
                debug!(match_id = %match_id, "Ignoring update to settled prediction");
                false
            }
            Some(existing) => {
                existing.home_score = home_score;
                existing.away_score = away_score;
                existing.predicted_at = now;
                debug!(match_id = %match_id, home_score, away_score, "Prediction updated");
                true
            }
            None => {
                self.predictions.push(Prediction::new(
                    match_id, home_score, away_score, sport_type, now,
                ));
                debug!(match_id = %match_id, home_score, away_score, "Prediction created");
                true
            }
        }
    }

    /// Removes an unsettled prediction. Settled ones stay for the stats.
    pub fn remove(&mut self, match_id: &str) -> bool {
        let before = self.predictions.len();
        self.predictions.retain(|p| p.match_id != match_id || p.settled);
        before != self.predictions.len()
    }

    /// Scores the prediction against the final result and refreshes stats.
    ///
    /// Sport resolution: the argument, then the sport stored at creation,
    /// then football.
    pub fn settle(
        &mut self,
        match_id: &str,
        actual_home_score: u32,
        actual_away_score: u32,
        sport_type: Option<SportType>,
    ) -> Option<ScoreOutcome> {
        let prediction = self
            .predictions
            .iter_mut()
            .find(|p| p.match_id == match_id)?;

        if prediction.settled {
            debug!(match_id = %match_id, "Prediction already settled");
            return None;
        }

        let sport = sport_type
            .or(prediction.sport_type)
            .unwrap_or_default();
        let outcome = calculate_points(
            prediction.home_score,
            prediction.away_score,
            actual_home_score,
            actual_away_score,
            sport,
        );

        prediction.sport_type.get_or_insert(sport);
        prediction.actual_home_score = Some(actual_home_score);
        prediction.actual_away_score = Some(actual_away_score);
        prediction.points = Some(outcome.points);
        prediction.point_type = Some(outcome.kind);
        prediction.settled = true;

        debug!(
            match_id = %match_id,
            sport = %sport,
            points = outcome.points,
            point_type = %outcome.kind,
            "Prediction settled"
        );

        self.recalculate_stats();
        Some(outcome)
    }

    /// Settles every finished match that has a final score and an open
    /// prediction. Returns how many were settled.
    pub fn settle_finished(&mut self, matches: &[FinishedMatch]) -> usize {
        matches
            .iter()
            .filter_map(|m| match (m.home_score, m.away_score) {
                (Some(home), Some(away)) => self.settle(&m.match_id, home, away, m.sport_type),
                _ => None,
            })
            .count()
    }

    /// Settled predictions, newest first, optionally for one sport.
    /// Predictions without a recorded sport count as football.
    pub fn settled_history(&self, sport: Option<SportType>) -> Vec<&Prediction> {
        let mut history: Vec<&Prediction> = self
            .predictions
            .iter()
            .filter(|p| p.settled)
            .filter(|p| sport.map_or(true, |s| p.sport_type.unwrap_or_default() == s))
            .collect();
        history.sort_by(|a, b| b.predicted_at.cmp(&a.predicted_at));
        history
    }

    pub fn recalculate_stats(&mut self) {
        self.stats = PredictionStats::from_predictions(&self.predictions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictions::{clock::test_utils::SteppingClock, PointType};

    fn book() -> PredictionBook {
        PredictionBook::new().with_clock(Arc::new(SteppingClock::starting_at(
            "2026-01-19T09:00:00Z",
        )))
    }

    #[test]
    fn add_creates_unsettled_prediction() {
        let mut book = book();
        assert!(book.add_or_update("m1", 2, 1, Some(SportType::Football)));

        let prediction = book.get("m1").unwrap();
        assert_eq!(prediction.home_score, 2);
        assert_eq!(prediction.away_score, 1);
        assert!(!prediction.settled);
        assert!(prediction.points.is_none());
        assert!(book.has("m1"));
        assert!(!book.has("m2"));
    }

    #[test]
    fn second_add_updates_existing_prediction() {
        let mut book = book();
        book.add_or_update("m1", 2, 1, Some(SportType::Basketball));
        let first_time = book.get("m1").unwrap().predicted_at;

        book.add_or_update("m1", 0, 0, Some(SportType::Football));

        assert_eq!(book.predictions().len(), 1);
        let prediction = book.get("m1").unwrap();
        assert_eq!((prediction.home_score, prediction.away_score), (0, 0));
        assert!(prediction.predicted_at > first_time);
        // sport is fixed at creation
        assert_eq!(prediction.sport_type, Some(SportType::Basketball));
    }

    #[test]
    fn settle_scores_and_freezes_prediction() {
        let mut book = book();
        book.add_or_update("m1", 2, 1, None);

        let outcome = book.settle("m1", 3, 2, None).unwrap();
        assert_eq!(outcome, ScoreOutcome::new(PointType::Diff, 2));

        let prediction = book.get("m1").unwrap().clone();
        assert!(prediction.settled);
        assert_eq!(prediction.actual_home_score, Some(3));
        assert_eq!(prediction.actual_away_score, Some(2));
        assert_eq!(prediction.points, Some(2));
        assert_eq!(prediction.point_type, Some(PointType::Diff));

        assert!(!book.add_or_update("m1", 9, 9, None));
        assert_eq!(book.get("m1").unwrap(), &prediction);
    }

    #[test]
    fn settle_twice_is_a_no_op() {
        let mut book = book();
        book.add_or_update("m1", 2, 1, None);

        assert!(book.settle("m1", 2, 1, None).is_some());
        let after_first = book.to_snapshot();

        assert!(book.settle("m1", 2, 1, None).is_none());
        assert!(book.settle("m1", 0, 5, Some(SportType::Basketball)).is_none());
        assert_eq!(book.to_snapshot(), after_first);
        assert_eq!(book.stats().total_predictions, 1);
        assert_eq!(book.stats().exact_matches, 1);
    }

    #[test]
    fn settle_unknown_match_is_a_no_op() {
        let mut book = book();
        assert!(book.settle("missing", 1, 0, None).is_none());
        assert_eq!(book.stats(), &PredictionStats::default());
    }

    #[test]
    fn settle_sport_falls_back_to_stored_then_football() {
        let mut book = book();
        book.add_or_update("hoops", 100, 98, Some(SportType::Basketball));
        book.add_or_update("plain", 100, 98, None);
        book.add_or_update("override", 100, 98, None);

        let hoops = book.settle("hoops", 104, 95, None).unwrap();
        let plain = book.settle("plain", 104, 95, None).unwrap();
        let overridden = book.settle("override", 104, 95, Some(SportType::Baseball)).unwrap();

        assert_eq!(hoops, ScoreOutcome::new(PointType::Close5, 3));
        assert_eq!(plain, ScoreOutcome::new(PointType::Winner, 1));
        assert_eq!(overridden, ScoreOutcome::new(PointType::Close5, 3));
        assert_eq!(book.get("plain").unwrap().sport_type, Some(SportType::Football));
    }

    #[test]
    fn remove_only_touches_unsettled_predictions() {
        let mut book = book();
        book.add_or_update("open", 1, 0, None);
        book.add_or_update("done", 1, 0, None);
        book.settle("done", 1, 0, None);

        assert!(book.remove("open"));
        assert!(!book.remove("done"));
        assert!(!book.remove("missing"));

        assert!(!book.has("open"));
        assert!(book.has("done"));
    }

    #[test]
    fn stats_are_rebuilt_after_each_settlement() {
        let mut book = book();
        for id in ["a", "b", "c"] {
            book.add_or_update(id, 1, 0, Some(SportType::Football));
        }

        book.settle("a", 2, 0, None); // winner
        book.settle("b", 0, 1, None); // miss
        book.settle("c", 1, 0, None); // exact

        let stats = book.stats();
        assert_eq!(stats.total_predictions, 3);
        assert_eq!(stats.total_points, 4);
        assert_eq!(stats.exact_matches, 1);
        assert_eq!(stats.correct_winner, 1);
        assert_eq!(stats.best_streak, 1);
        assert_eq!(stats.current_streak, 1);
    }

    #[test]
    fn settle_finished_skips_matches_without_scores() {
        let mut book = book();
        book.add_or_update("m1", 1, 1, None);
        book.add_or_update("m2", 2, 0, None);
        book.add_or_update("m3", 80, 70, Some(SportType::Basketball));

        let finished = vec![
            FinishedMatch {
                match_id: "m1".into(),
                home_score: Some(1),
                away_score: Some(1),
                sport_type: Some(SportType::Football),
            },
            FinishedMatch {
                match_id: "m2".into(),
                home_score: None,
                away_score: Some(0),
                sport_type: None,
            },
            FinishedMatch {
                match_id: "m3".into(),
                home_score: Some(88),
                away_score: Some(72),
                sport_type: Some(SportType::Basketball),
            },
            FinishedMatch {
                match_id: "unpredicted".into(),
                home_score: Some(3),
                away_score: Some(3),
                sport_type: None,
            },
        ];

        assert_eq!(book.settle_finished(&finished), 2);
        assert!(!book.get("m2").unwrap().settled);
        assert_eq!(book.get("m3").unwrap().point_type, Some(PointType::Close10));

        // replaying the same feed changes nothing
        assert_eq!(book.settle_finished(&finished), 0);
    }

    #[test]
    fn settled_history_is_newest_first_and_filterable() {
        let mut book = book();
        book.add_or_update("f1", 1, 0, Some(SportType::Football));
        book.add_or_update("b1", 90, 80, Some(SportType::Basketball));
        book.add_or_update("f2", 0, 0, None);
        book.add_or_update("open", 2, 2, None);
        book.settle("f1", 1, 0, None);
        book.settle("b1", 90, 85, None);
        book.settle("f2", 0, 0, None);

        let all: Vec<&str> = book
            .settled_history(None)
            .iter()
            .map(|p| p.match_id.as_str())
            .collect();
        assert_eq!(all, vec!["f2", "b1", "f1"]);

        let football: Vec<&str> = book
            .settled_history(Some(SportType::Football))
            .iter()
            .map(|p| p.match_id.as_str())
            .collect();
        assert_eq!(football, vec!["f2", "f1"]);
    }

    #[test]
    fn snapshot_restores_predictions_and_rederives_stats() {
        let mut book = book();
        book.add_or_update("m1", 1, 0, None);
        book.add_or_update("m2", 3, 1, None);
        book.settle("m1", 1, 0, None);

        let mut snapshot = book.to_snapshot();
        snapshot.stats = PredictionStats::default();
        snapshot.predictions.push(snapshot.predictions[0].clone());

        let restored = PredictionBook::from_snapshot(snapshot);
        assert_eq!(restored.predictions().len(), 2);
        assert_eq!(restored.stats(), book.stats());
        assert_eq!(restored.get("m2"), book.get("m2"));
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut book = book();
        book.add_or_update("m1", 1, 0, Some(SportType::Baseball));
        book.settle("m1", 4, 2, None);

        let json = serde_json::to_string(&book.to_snapshot()).unwrap();
        let parsed: PredictionSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, book.to_snapshot());
        assert!(json.contains("\"pointType\":\"close5\""));
        assert!(json.contains("\"totalPoints\":3"));
    }
}
