//! Capture-once, replay-many handling of HTTP bodies.
//!
//! Both the inbound request and the query service response are read to
//! completion into a [`CapturedBody`] before anything decodes them. The raw
//! bytes can then be logged verbatim and handed to a decoder, or replayed as a
//! fresh body, without a second read of the original stream.

use std::error::Error;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Bytes;
use serde::de::DeserializeOwned;

use crate::{error::RecordError, AppState};

type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Debug, Clone)]
pub struct CapturedBody {
    bytes: Bytes,
}

impl CapturedBody {
    /// Reads `body` to the end, failing if it errors or exceeds `limit` bytes.
    pub async fn read<B>(body: B, limit: usize) -> Result<Self, BoxError>
    where
        B: hyper::body::Body,
        B::Error: Into<BoxError>,
    {
        let collected = Limited::new(body, limit).collect().await?;
        Ok(Self {
            bytes: collected.to_bytes(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// A new body yielding exactly the captured bytes.
    pub fn replay(&self) -> Full<Bytes> {
        Full::new(self.bytes.clone())
    }

    pub fn decode_json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.bytes)
    }

    /// Lossy text form, for logs only.
    pub fn to_log_string(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl From<Bytes> for CapturedBody {
    fn from(bytes: Bytes) -> Self {
        Self { bytes }
    }
}

/// Buffers the request body and swaps it for a replay before the handler runs.
pub async fn capture_request_body(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();

    let captured = match CapturedBody::read(body, state.max_body_bytes).await {
        Ok(captured) => captured,
        Err(e) => return RecordError::IoRead(e.to_string()).into_response(),
    };

    tracing::debug!(
        bytes = captured.len(),
        body = %captured.to_log_string(),
        "Captured request body"
    );

    let request = Request::from_parts(parts, Body::new(captured.replay()));
    next.run(request).await
}
