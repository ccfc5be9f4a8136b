//! # Medical records gateway
//! Serves `POST /create` in front of the query-execution service.
use medical_records_gateway::{config::AppConfig, create_app, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    let state = AppState::from_config(&config)?;
    tracing::info!(
        query_service = %state.query_service.endpoint(),
        return_record_id = config.return_record_id,
        "Forwarding records to query service"
    );

    let app = create_app(state).await;

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;

    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
