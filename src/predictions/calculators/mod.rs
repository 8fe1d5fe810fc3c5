mod football;
mod high_score;

pub use football::FootballScoreCalculator;
pub use high_score::HighScoreCalculator;

use super::{ScoreCalculator, ScoreLine, ScoreOutcome, SportType};

static FOOTBALL: FootballScoreCalculator = FootballScoreCalculator;
static HIGH_SCORE: HighScoreCalculator = HighScoreCalculator;

/// Picks the rule family for a sport; basketball and baseball share one
pub fn calculator_for(sport: SportType) -> &'static dyn ScoreCalculator {
    match sport {
        SportType::Football => &FOOTBALL,
        SportType::Basketball | SportType::Baseball => &HIGH_SCORE,
    }
}

pub fn calculate_points(
    predicted_home: u32,
    predicted_away: u32,
    actual_home: u32,
    actual_away: u32,
    sport: SportType,
) -> ScoreOutcome {
    calculator_for(sport).calculate(
        ScoreLine::new(predicted_home, predicted_away),
        ScoreLine::new(actual_home, actual_away),
    )
}
