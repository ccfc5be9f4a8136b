//! Errors raised while creating a medical record.
//!
//! Every variant is terminal for the request that produced it and is turned
//! into a JSON response of the form `{"error": "<message>"}`. The `Display`
//! text is what the caller sees, so it stays generic; details carried by a
//! variant are only written to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type RecordResult<T> = Result<T, RecordError>;

#[derive(Debug, Error)]
pub enum RecordError {
    /// The inbound body could not be read to completion.
    #[error("Error al leer el cuerpo de la solicitud")]
    IoRead(String),

    /// The inbound body is not a JSON object.
    #[error("Formato JSON inválido: {0}")]
    InvalidPayload(String),

    #[error("Falta el campo: {0}")]
    MissingField(&'static str),

    #[error("Error al preparar la consulta")]
    Serialization(String),

    /// Connection refused, DNS failure or timeout.
    #[error("Error al conectar con el servicio de consulta")]
    UpstreamUnreachable(String),

    /// The query service answered with a non-success status.
    #[error("Error al crear el registro del paciente")]
    UpstreamStatus(StatusCode),

    #[error("Error al procesar la respuesta del servicio de consulta")]
    ResponseDecode(String),

    #[error("La respuesta del servicio de consulta no contiene datos")]
    MissingResultData,

    #[error("La primera fila de la respuesta no es un objeto")]
    MalformedRow,

    #[error("La respuesta del servicio de consulta no contiene el campo id")]
    MissingIdentifier,
}

impl RecordError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RecordError::IoRead(_)
            | RecordError::InvalidPayload(_)
            | RecordError::MissingField(_) => StatusCode::BAD_REQUEST,

            RecordError::UpstreamStatus(status) => *status,

            RecordError::Serialization(_)
            | RecordError::UpstreamUnreachable(_)
            | RecordError::ResponseDecode(_)
            | RecordError::MissingResultData
            | RecordError::MalformedRow
            | RecordError::MissingIdentifier => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body of every error response.
#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for RecordError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), error = ?self, "Rejected record request");
        } else {
            tracing::error!(status = status.as_u16(), error = ?self, "Failed to create record");
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
