//! Client for the query-execution service.
//!
//! One `POST <base>/query` per inbound request, no retries. The whole exchange,
//! including reading the response body, runs under a single timeout.

use std::time::Duration;

use axum::http::{header, Method, Request, Uri};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::capture::CapturedBody;
use crate::error::{RecordError, RecordResult};
use crate::query::QueryPayload;

#[derive(Debug, Clone)]
pub struct QueryServiceClient {
    http: Client<HttpConnector, Full<Bytes>>,
    endpoint: Uri,
    timeout: Duration,
    max_body_bytes: usize,
}

impl QueryServiceClient {
    pub fn new(endpoint: Uri, timeout: Duration, max_body_bytes: usize) -> Self {
        let http = Client::builder(TokioExecutor::new()).build_http();

        Self {
            http,
            endpoint,
            timeout,
            max_body_bytes,
        }
    }

    pub fn endpoint(&self) -> &Uri {
        &self.endpoint
    }

    /// Sends `payload` and returns the captured body of a successful response.
    pub async fn execute(&self, payload: &QueryPayload) -> RecordResult<CapturedBody> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(self.endpoint.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(payload.to_body()?)))
            .map_err(|e| RecordError::Serialization(e.to_string()))?;

        let exchange = async {
            let response = self
                .http
                .request(request)
                .await
                .map_err(|e| RecordError::UpstreamUnreachable(e.to_string()))?;

            let status = response.status();
            let body = CapturedBody::read(response.into_body(), self.max_body_bytes).await;

            Ok::<_, RecordError>((status, body))
        };

        let (status, body) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| {
                RecordError::UpstreamUnreachable(format!(
                    "no response from {} within {:?}",
                    self.endpoint, self.timeout
                ))
            })??;

        if !status.is_success() {
            if let Ok(body) = &body {
                tracing::debug!(body = %body.to_log_string(), "Query service error body");
            }
            return Err(RecordError::UpstreamStatus(status));
        }

        let body = body.map_err(|e| RecordError::ResponseDecode(e.to_string()))?;
        tracing::debug!(
            status = status.as_u16(),
            body = %body.to_log_string(),
            "Query service responded"
        );

        Ok(body)
    }
}
