use score_challenge::{
    config::ServerConfig,
    predictions::{
        repository::PostgresPredictionRepository, InMemoryPredictionRepository,
        PredictionRepository, PredictionService,
    },
    routes::app,
    shared::AppState,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "score_challenge=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting score challenge server");

    let config = ServerConfig::from_env()?;

    let repository: Arc<dyn PredictionRepository> = match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(database_url).await?;
            let repository = PostgresPredictionRepository::new(pool);
            repository.ensure_schema().await?;
            info!("Using PostgreSQL prediction repository");
            Arc::new(repository)
        }
        None => {
            info!("DATABASE_URL not set, using in-memory prediction repository");
            Arc::new(InMemoryPredictionRepository::new())
        }
    };

    let app_state = AppState::new(
        Arc::new(PredictionService::new(repository)),
        config.default_timezone.clone(),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        addr = %config.bind_addr,
        default_timezone = %config.default_timezone,
        "Server running"
    );
    axum::serve(listener, app(app_state)).await?;

    Ok(())
}
