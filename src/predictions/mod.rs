pub mod book;
pub mod calculators;
pub mod clock;
pub mod models;
pub mod repository;
pub mod service;
pub mod stats;

mod errors;
mod handlers;
mod types;

pub use book::{PredictionBook, PredictionSnapshot};
pub use calculators::{calculate_points, calculator_for};
pub use clock::{Clock, SystemClock};
pub use errors::PredictionError;
pub use handlers::{
    delete_book, get_history, get_prediction, get_snapshot, get_stats, remove_prediction,
    settle_finished, settle_prediction, submit_prediction,
};
pub use models::*;
pub use repository::{InMemoryPredictionRepository, PredictionRepository};
pub use service::PredictionService;
pub use stats::PredictionStats;
pub use types::*;

/// Scores a predicted scoreline against the final one.
///
/// Implementations evaluate their tiers top to bottom and return the first
/// that matches.
pub trait ScoreCalculator: Send + Sync {
    fn calculate(&self, predicted: ScoreLine, actual: ScoreLine) -> ScoreOutcome;
}
