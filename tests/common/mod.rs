#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use http_body_util::BodyExt;
use hyper::{body::Incoming, Request};
use hyper_util::client::legacy::{connect::HttpConnector, Client};

use medical_records_gateway::config::AppConfig;
use medical_records_gateway::query::QueryPayload;
use medical_records_gateway::{create_app, AppState};

pub type TestClient = Client<HttpConnector, Body>;

/// Stands in for the query-execution service and records every payload.
#[derive(Clone)]
pub struct StubQueryService {
    pub calls: Arc<Mutex<Vec<QueryPayload>>>,
    status: StatusCode,
    body: String,
    delay: Duration,
}

impl StubQueryService {
    pub fn new(status: StatusCode, body: &str) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<QueryPayload> {
        self.calls.lock().unwrap().clone()
    }

    /// Serves the stub on a random port and returns its base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/query", post(stub_query))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind(&"127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().expect("Get stub address");
        tokio::spawn(async move { axum::serve(listener, app).await.expect("start stub server") });

        format!("http://{addr}")
    }
}

async fn stub_query(
    State(stub): State<StubQueryService>,
    Json(payload): Json<QueryPayload>,
) -> Response {
    stub.calls.lock().unwrap().push(payload);
    tokio::time::sleep(stub.delay).await;

    (
        stub.status,
        [(header::CONTENT_TYPE, "application/json")],
        stub.body.clone(),
    )
        .into_response()
}

/// A base URL nothing is listening on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind(&"127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub async fn spawn_app(config: AppConfig) -> SocketAddr {
    let state = AppState::from_config(&config).expect("Build app state");
    let app = create_app(state).await;

    let listener = tokio::net::TcpListener::bind(&"127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().expect("Get test app address");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("start axum server") });

    addr
}

pub fn config_for(query_service_url: String) -> AppConfig {
    AppConfig {
        query_service_url,
        ..AppConfig::default()
    }
}

pub fn client() -> TestClient {
    hyper_util::client::legacy::Builder::new(hyper_util::rt::TokioExecutor::new()).build_http()
}

pub async fn post_create(
    client: &TestClient,
    address: &SocketAddr,
    body: impl Into<Body>,
) -> (StatusCode, serde_json::Value) {
    let response = client
        .request(
            Request::builder()
                .method("POST")
                .uri(format!("http://{address}/create"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    (status, convert_body_to_json(response).await)
}

pub async fn convert_body_to_json(body: hyper::Response<Incoming>) -> serde_json::Value {
    let bytes = body
        .into_body()
        .collect()
        .await
        .expect("Collect bytes from incoming")
        .to_bytes();

    serde_json::from_slice(&bytes).expect("Response body is JSON")
}
