use super::super::{PointType, ScoreCalculator, ScoreLine, ScoreOutcome};

const CLOSE_MARGIN: u32 = 5;
const NEAR_MARGIN: u32 = 10;

/// Rule for basketball and baseball, where exact scores are rare and
/// closeness bands replace goal difference
pub struct HighScoreCalculator;

impl Default for HighScoreCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl HighScoreCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl ScoreCalculator for HighScoreCalculator {
    fn calculate(&self, predicted: ScoreLine, actual: ScoreLine) -> ScoreOutcome {
        if predicted == actual {
            return ScoreOutcome::new(PointType::Exact, 5);
        }

        if predicted.within(&actual, CLOSE_MARGIN) {
            return ScoreOutcome::new(PointType::Close5, 3);
        }

        if predicted.within(&actual, NEAR_MARGIN) {
            return ScoreOutcome::new(PointType::Close10, 2);
        }

        if predicted.outcome() == actual.outcome() {
            return ScoreOutcome::new(PointType::Winner, 1);
        }

        ScoreOutcome::new(PointType::Miss, 0)
    }
}
