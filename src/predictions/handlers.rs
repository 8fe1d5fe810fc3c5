use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::{
    FinishedMatch, HistoryQuery, Prediction, PredictionRequest, PredictionSnapshot,
    PredictionStats, SettleRequest, SettlementResponse, SportType,
};
use crate::shared::{AppError, AppState};

/// GET /users/:user_id/predictions
#[instrument(name = "get_snapshot", skip(state))]
pub async fn get_snapshot(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<PredictionSnapshot>, AppError> {
    let snapshot = state.prediction_service.snapshot(&user_id).await?;
    Ok(Json(snapshot))
}

/// GET /users/:user_id/predictions/:match_id
#[instrument(name = "get_prediction", skip(state))]
pub async fn get_prediction(
    State(state): State<AppState>,
    Path((user_id, match_id)): Path<(String, String)>,
) -> Result<Json<Prediction>, AppError> {
    let prediction = state
        .prediction_service
        .get_prediction(&user_id, &match_id)
        .await?;
    Ok(Json(prediction))
}

/// PUT /users/:user_id/predictions/:match_id
///
/// Creates the prediction or changes its score while the match is open.
#[instrument(name = "submit_prediction", skip(state))]
pub async fn submit_prediction(
    State(state): State<AppState>,
    Path((user_id, match_id)): Path<(String, String)>,
    Json(request): Json<PredictionRequest>,
) -> Result<Json<Prediction>, AppError> {
    info!(
        home_score = request.home_score,
        away_score = request.away_score,
        "Submitting prediction"
    );

    let prediction = state
        .prediction_service
        .submit_prediction(
            &user_id,
            &match_id,
            request.home_score,
            request.away_score,
            request.sport_type,
        )
        .await?;
    Ok(Json(prediction))
}

/// DELETE /users/:user_id/predictions/:match_id
#[instrument(name = "remove_prediction", skip(state))]
pub async fn remove_prediction(
    State(state): State<AppState>,
    Path((user_id, match_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let removed = state
        .prediction_service
        .remove_prediction(&user_id, &match_id)
        .await?;

    info!(removed, "Prediction removal processed");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /users/:user_id/predictions
#[instrument(name = "delete_book", skip(state))]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.prediction_service.delete_book(&user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /users/:user_id/predictions/:match_id/settle
#[instrument(name = "settle_prediction", skip(state))]
pub async fn settle_prediction(
    State(state): State<AppState>,
    Path((user_id, match_id)): Path<(String, String)>,
    Json(request): Json<SettleRequest>,
) -> Result<Json<Prediction>, AppError> {
    let prediction = state
        .prediction_service
        .settle_prediction(
            &user_id,
            &match_id,
            request.actual_home_score,
            request.actual_away_score,
            request.sport_type,
        )
        .await?;
    Ok(Json(prediction))
}

/// POST /users/:user_id/settlements
///
/// Settles every open prediction whose match appears finished in the body.
#[instrument(name = "settle_finished", skip(state, matches))]
pub async fn settle_finished(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(matches): Json<Vec<FinishedMatch>>,
) -> Result<Json<SettlementResponse>, AppError> {
    let (settled, stats) = state
        .prediction_service
        .settle_finished(&user_id, &matches)
        .await?;
    Ok(Json(SettlementResponse { settled, stats }))
}

/// GET /users/:user_id/stats
#[instrument(name = "get_stats", skip(state))]
pub async fn get_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<PredictionStats>, AppError> {
    let stats = state.prediction_service.stats(&user_id).await?;
    Ok(Json(stats))
}

/// GET /users/:user_id/history?sport=BASKETBALL
#[instrument(name = "get_history", skip(state))]
pub async fn get_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<Prediction>>, AppError> {
    let sport = query
        .sport
        .as_deref()
        .map(|sport| {
            SportType::from_str(sport)
                .map_err(|_| AppError::BadRequest(format!("Unknown sport: {sport}")))
        })
        .transpose()?;

    let history = state.prediction_service.history(&user_id, sport).await?;
    Ok(Json(history))
}

#[cfg(test)]
mod tests {
    use crate::routes::app;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt; // for `oneshot`

    async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_submit_and_get_prediction() {
        let app = app(AppStateBuilder::new().build());

        let (status, body) = send(
            &app,
            "PUT",
            "/users/u1/predictions/m1",
            Some(json!({"homeScore": 2, "awayScore": 1, "sportType": "FOOTBALL"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["matchId"], "m1");
        assert_eq!(body["settled"], false);

        let (status, body) = send(&app, "GET", "/users/u1/predictions/m1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["homeScore"], 2);
        assert_eq!(body["sportType"], "FOOTBALL");
    }

    #[tokio::test]
    async fn test_get_missing_prediction_returns_404() {
        let app = app(AppStateBuilder::new().build());

        let (status, body) = send(&app, "GET", "/users/u1/predictions/none", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("none"));
    }

    #[tokio::test]
    async fn test_settle_prediction_handler() {
        let app = app(AppStateBuilder::new().build());
        send(
            &app,
            "PUT",
            "/users/u1/predictions/m1",
            Some(json!({"homeScore": 3, "awayScore": 0})),
        )
        .await;

        let (status, body) = send(
            &app,
            "POST",
            "/users/u1/predictions/m1/settle",
            Some(json!({"actualHomeScore": 1, "actualAwayScore": 0})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["settled"], true);
        assert_eq!(body["points"], 1);
        assert_eq!(body["pointType"], "winner");

        let (_, stats) = send(&app, "GET", "/users/u1/stats", None).await;
        assert_eq!(stats["totalPredictions"], 1);
        assert_eq!(stats["correctWinner"], 1);
        assert_eq!(stats["currentStreak"], 1);
    }

    #[tokio::test]
    async fn test_remove_prediction_returns_no_content() {
        let app = app(AppStateBuilder::new().build());
        send(
            &app,
            "PUT",
            "/users/u1/predictions/m1",
            Some(json!({"homeScore": 0, "awayScore": 0})),
        )
        .await;

        let (status, _) = send(&app, "DELETE", "/users/u1/predictions/m1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "GET", "/users/u1/predictions/m1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_book_clears_user() {
        let app = app(AppStateBuilder::new().build());
        send(
            &app,
            "PUT",
            "/users/u1/predictions/m1",
            Some(json!({"homeScore": 1, "awayScore": 0})),
        )
        .await;
        send(
            &app,
            "POST",
            "/users/u1/predictions/m1/settle",
            Some(json!({"actualHomeScore": 1, "actualAwayScore": 0})),
        )
        .await;

        let (status, _) = send(&app, "DELETE", "/users/u1/predictions", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, "GET", "/users/u1/predictions", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["predictions"].as_array().unwrap().len(), 0);
        assert_eq!(body["stats"]["totalPoints"], 0);
    }

    #[tokio::test]
    async fn test_history_rejects_unknown_sport() {
        let app = app(AppStateBuilder::new().build());

        let (status, _) = send(&app, "GET", "/users/u1/history?sport=cricket", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, "GET", "/users/u1/history?sport=basketball", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}
