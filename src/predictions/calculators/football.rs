use super::super::{PointType, ScoreCalculator, ScoreLine, ScoreOutcome};

/// Low-scoring rule: exact score, then goal difference, then winner
pub struct FootballScoreCalculator;

impl Default for FootballScoreCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl FootballScoreCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl ScoreCalculator for FootballScoreCalculator {
    fn calculate(&self, predicted: ScoreLine, actual: ScoreLine) -> ScoreOutcome {
        if predicted == actual {
            return ScoreOutcome::new(PointType::Exact, 3);
        }

        if predicted.difference() == actual.difference() {
            return ScoreOutcome::new(PointType::Diff, 2);
        }

        if predicted.outcome() == actual.outcome() {
            return ScoreOutcome::new(PointType::Winner, 1);
        }

        ScoreOutcome::new(PointType::Miss, 0)
    }
}
