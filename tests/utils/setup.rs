use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use score_challenge::{
    app,
    predictions::{InMemoryPredictionRepository, PredictionService},
    AppState,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub app: Router,
    pub repository: Arc<InMemoryPredictionRepository>,
    pub user_id: String,
}

pub struct TestSetupBuilder {
    user_id: String,
    default_timezone: String,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            user_id: "user-123".to_string(),
            default_timezone: "Asia/Seoul".to_string(),
        }
    }

    #[allow(dead_code)]
    pub fn with_user(mut self, user_id: &str) -> Self {
        self.user_id = user_id.to_string();
        self
    }

    pub fn build(self) -> TestSetup {
        let repository = Arc::new(InMemoryPredictionRepository::new());
        let service = Arc::new(PredictionService::new(repository.clone()));
        let state = AppState::new(service, self.default_timezone);

        TestSetup {
            app: app(state),
            repository,
            user_id: self.user_id,
        }
    }
}

// ============================================================================
// Request Helpers
// ============================================================================

impl TestSetup {
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    /// Submit a prediction for the default user
    pub async fn predict(&self, match_id: &str, home: u32, away: u32, sport: Option<&str>) -> Value {
        let mut body = serde_json::json!({ "homeScore": home, "awayScore": away });
        if let Some(sport) = sport {
            body["sportType"] = Value::from(sport);
        }

        let uri = format!("/users/{}/predictions/{}", self.user_id, match_id);
        let (status, value) = self.request("PUT", &uri, Some(body)).await;
        assert_eq!(status, StatusCode::OK, "prediction should be accepted");
        value
    }

    /// Settle one prediction for the default user
    pub async fn settle(&self, match_id: &str, home: u32, away: u32) -> (StatusCode, Value) {
        let uri = format!("/users/{}/predictions/{}/settle", self.user_id, match_id);
        self.request(
            "POST",
            &uri,
            Some(serde_json::json!({ "actualHomeScore": home, "actualAwayScore": away })),
        )
        .await
    }

    pub async fn stats(&self) -> Value {
        let uri = format!("/users/{}/stats", self.user_id);
        let (status, value) = self.request("GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        value
    }
}
