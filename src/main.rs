use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use event_recommender::api::{create_router, AppState};
use event_recommender::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "event_recommender=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let state = AppState::from_config(&config)?;

    tracing::info!(
        half_life_days = config.half_life_days,
        weight_count = state.engine.weights().len(),
        default_requested_items = config.default_requested_items,
        "Scoring engine configured"
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
