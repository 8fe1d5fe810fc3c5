use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum SportType {
    #[default]
    Football,
    Basketball,
    Baseball,
}

/// Which scoring tier a settled prediction landed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PointType {
    Exact,
    Close5,
    Close10,
    Diff,
    Winner,
    Miss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MatchOutcome {
    Home,
    Away,
    Draw,
}

/// A home/away scoreline, either predicted or final
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreLine {
    pub home: u32,
    pub away: u32,
}

impl ScoreLine {
    pub fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }

    /// Home minus away
    pub fn difference(&self) -> i64 {
        self.home as i64 - self.away as i64
    }

    pub fn outcome(&self) -> MatchOutcome {
        match self.home.cmp(&self.away) {
            std::cmp::Ordering::Greater => MatchOutcome::Home,
            std::cmp::Ordering::Less => MatchOutcome::Away,
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
        }
    }

    /// True when both sides are within `margin` of `other`
    pub fn within(&self, other: &ScoreLine, margin: u32) -> bool {
        self.home.abs_diff(other.home) <= margin && self.away.abs_diff(other.away) <= margin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub kind: PointType,
    pub points: u32,
}

impl ScoreOutcome {
    pub fn new(kind: PointType, points: u32) -> Self {
        Self { kind, points }
    }
}

/// One user's forecast for one match.
///
/// Scoring fields stay `None` until the prediction is settled; after that the
/// record is frozen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub match_id: String,
    pub home_score: u32,
    pub away_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport_type: Option<SportType>,
    pub predicted_at: DateTime<Utc>,
    #[serde(default)]
    pub settled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_home_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_away_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_type: Option<PointType>,
}

impl Prediction {
    pub fn new(
        match_id: impl Into<String>,
        home_score: u32,
        away_score: u32,
        sport_type: Option<SportType>,
        predicted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            match_id: match_id.into(),
            home_score,
            away_score,
            sport_type,
            predicted_at,
            settled: false,
            actual_home_score: None,
            actual_away_score: None,
            points: None,
            point_type: None,
        }
    }

    pub fn predicted(&self) -> ScoreLine {
        ScoreLine::new(self.home_score, self.away_score)
    }

    /// Settled with at least one point (correct winner or better)
    pub fn is_hit(&self) -> bool {
        self.points.is_some_and(|points| points >= 1)
    }
}

/// A finished match as reported by the live-score feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedMatch {
    pub match_id: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    #[serde(default)]
    pub sport_type: Option<SportType>,
}
