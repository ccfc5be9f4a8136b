use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::capture::CapturedBody;
use crate::error::{RecordError, RecordResult};

/// Fields that must be present, checked in this order.
pub const REQUIRED_FIELDS: [&str; 3] = ["description", "id_patient", "id_user"];

pub const CREATED_MESSAGE: &str = "Registro creado exitosamente";

/// Inbound body of `POST /create`. Any JSON object is accepted; only the
/// required fields are ever looked at.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CreateRecordRequest(pub Map<String, Value>);

impl CreateRecordRequest {
    pub fn decode(body: &CapturedBody) -> RecordResult<Self> {
        body.decode_json()
            .map_err(|e| RecordError::InvalidPayload(e.to_string()))
    }

    /// Checks that every required key is present, whatever its value, and
    /// keeps just those values. Reports only the first missing field.
    pub fn validate(mut self) -> RecordResult<NewMedicalRecord> {
        if let Some(field) = REQUIRED_FIELDS
            .into_iter()
            .find(|field| !self.0.contains_key(*field))
        {
            return Err(RecordError::MissingField(field));
        }

        let mut take = |field: &str| self.0.remove(field).unwrap_or(Value::Null);
        Ok(NewMedicalRecord {
            description: take("description"),
            id_patient: take("id_patient"),
            id_user: take("id_user"),
        })
    }
}

/// The values forwarded to the query service, untouched from the request.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewMedicalRecord {
    pub description: Value,
    pub id_patient: Value,
    pub id_user: Value,
}

/// Success body of `POST /create`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CreatedRecord {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

impl CreatedRecord {
    pub fn new(id: Option<Value>) -> Self {
        Self {
            message: CREATED_MESSAGE.to_string(),
            id,
        }
    }
}
