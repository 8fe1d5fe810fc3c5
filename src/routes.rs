use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::predictions;
use crate::shared::AppState;
use crate::timezone;

/// Builds the full HTTP surface
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/timezones", get(timezone::list_timezones))
        .route("/day-range", get(timezone::day_range))
        .route("/today-range", get(timezone::today_range))
        .route(
            "/users/:user_id/predictions",
            get(predictions::get_snapshot).delete(predictions::delete_book),
        )
        .route(
            "/users/:user_id/predictions/:match_id",
            put(predictions::submit_prediction)
                .get(predictions::get_prediction)
                .delete(predictions::remove_prediction),
        )
        .route(
            "/users/:user_id/predictions/:match_id/settle",
            post(predictions::settle_prediction),
        )
        .route("/users/:user_id/settlements", post(predictions::settle_finished))
        .route("/users/:user_id/stats", get(predictions::get_stats))
        .route("/users/:user_id/history", get(predictions::get_history))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
