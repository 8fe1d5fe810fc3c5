use serde::{Deserialize, Serialize};

use super::{PredictionStats, SportType};

/// Request payload for creating or changing a prediction
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    pub home_score: u32,
    pub away_score: u32,
    #[serde(default)]
    pub sport_type: Option<SportType>,
}

/// Request payload carrying a match's final score
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleRequest {
    pub actual_home_score: u32,
    pub actual_away_score: u32,
    #[serde(default)]
    pub sport_type: Option<SportType>,
}

/// Response for a batch settlement
#[derive(Debug, Serialize, Deserialize)]
pub struct SettlementResponse {
    pub settled: usize,
    pub stats: PredictionStats,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub sport: Option<String>,
}
