use std::{sync::Arc, time::Duration};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mood_tunes_api::{
    api::{create_router, AppState},
    config::Config,
    services::{DeezerClient, FaceDetector, RecommendationEngine, RustfaceDetector},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mood_tunes_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog = Arc::new(
        DeezerClient::new(
            config.catalog_api_url.clone(),
            Duration::from_secs(config.catalog_timeout_secs),
        )
        .context("Failed to build catalog client")?,
    );
    let detector = Arc::new(
        RustfaceDetector::new(&config.face_model_path)
            .context("Failed to initialize face detector")?,
    );
    tracing::info!(detector = detector.name(), "Face detector ready");

    let mut engine = RecommendationEngine::new(catalog.clone());
    if let Some(seed) = config.rng_seed {
        tracing::warn!(seed, "Using a fixed seed; every request draws the same genre");
        engine = engine.with_seed(seed);
    }

    let state = AppState::new(catalog, detector)
        .with_engine(engine)
        .with_limits(config.recommendation_limit, config.search_limit);

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, catalog = %config.catalog_api_url, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
