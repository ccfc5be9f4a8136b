//! # Medical records gateway
//! Accepts medical record creation requests and forwards them, as a
//! parameterized insert, to the query-execution service.
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

pub mod capture;
pub mod config;
pub mod error;
pub mod query;
pub mod query_client;
pub mod query_response;
pub mod record;

use capture::{capture_request_body, CapturedBody};
use config::{AppConfig, ConfigError};
use error::RecordResult;
use query::QueryPayload;
use query_client::QueryServiceClient;
use query_response::QueryServiceResponse;
use record::{CreateRecordRequest, CreatedRecord};

/// Shared by every request; holds no per-request state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub query_service: QueryServiceClient,
    pub return_record_id: bool,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            query_service: QueryServiceClient::new(
                config.query_endpoint()?,
                config.query_timeout,
                config.max_body_bytes,
            ),
            return_record_id: config.return_record_id,
            max_body_bytes: config.max_body_bytes,
        })
    }
}

/// Builds the gateway router; `main` and the integration tests both serve it.
pub async fn create_app(state: AppState) -> Router {
    Router::new()
        .route(
            "/create",
            post(create_record).route_layer(middleware::from_fn_with_state(
                state.clone(),
                capture_request_body,
            )),
        )
        .route("/heartbeat", get(heartbeat))
        // The capture layer enforces its own limit.
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

async fn create_record(
    State(state): State<AppState>,
    body: Bytes,
) -> RecordResult<Json<CreatedRecord>> {
    let body = CapturedBody::from(body);

    let request = CreateRecordRequest::decode(&body)?;
    tracing::info!(
        request = %serde_json::Value::Object(request.0.clone()),
        "Received record request"
    );

    let record = request.validate()?;
    let payload = QueryPayload::insert_medical_record(record, state.return_record_id);

    let response = state.query_service.execute(&payload).await?;

    let id = if state.return_record_id {
        let response = QueryServiceResponse::decode(&response)?;
        Some(response.record_id()?.clone())
    } else {
        None
    };

    tracing::info!(id = ?id, "Record created");
    Ok(Json(CreatedRecord::new(id)))
}

async fn heartbeat() -> Response {
    (StatusCode::OK).into_response()
}
