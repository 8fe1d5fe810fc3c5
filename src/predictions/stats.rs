use serde::{Deserialize, Serialize};

use super::Prediction;

/// Aggregate over settled predictions. Always rebuilt from scratch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionStats {
    pub total_predictions: u32,
    pub total_points: u32,
    /// Predictions worth 3 points: football's exact tier and the high-score
    /// sports' close5 tier both land here
    pub exact_matches: u32,
    pub correct_winner: u32,
    pub correct_diff: u32,
    pub current_streak: u32,
    pub best_streak: u32,
}

impl PredictionStats {
    pub fn from_predictions(predictions: &[Prediction]) -> Self {
        let mut settled: Vec<&Prediction> = predictions.iter().filter(|p| p.settled).collect();
        // stable, so equal timestamps keep insertion order
        settled.sort_by_key(|p| p.predicted_at);

        let mut stats = PredictionStats {
            total_predictions: settled.len() as u32,
            ..PredictionStats::default()
        };

        let mut running_streak = 0;
        for prediction in &settled {
            let Some(points) = prediction.points else {
                continue;
            };

            stats.total_points += points;
            match points {
                3 => stats.exact_matches += 1,
                2 => stats.correct_diff += 1,
                1 => stats.correct_winner += 1,
                _ => {}
            }

            if points >= 1 {
                running_streak += 1;
                stats.best_streak = stats.best_streak.max(running_streak);
            } else {
                running_streak = 0;
            }
        }

        stats.current_streak = settled
            .iter()
            .rev()
            .take_while(|p| p.is_hit())
            .count() as u32;

        stats
    }
}
