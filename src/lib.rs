pub mod config;
pub mod predictions;
pub mod routes;
pub mod shared;
pub mod timezone;

// Re-export commonly used types for easier access in tests
pub use predictions::{
    calculate_points, PointType, Prediction, PredictionBook, PredictionService,
    PredictionSnapshot, PredictionStats, ScoreOutcome, SportType,
};
pub use routes::app;
pub use shared::{AppError, AppState};
pub use timezone::{
    day_range_in_timezone, timezone_offset_minutes, today_range_in_timezone, utc_day_range,
    DayRange,
};
