use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RecordError, RecordResult};
use crate::record::NewMedicalRecord;

pub const INSERT_MEDICAL_RECORD: &str =
    "INSERT INTO medical_records (description, id_patient, id_user) VALUES ($1, $2, $3)";

/// Request body understood by the query service's `/query` endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QueryPayload {
    pub sql: String,
    pub args: Vec<Value>,
}

impl QueryPayload {
    /// Binds the record to `$1..$3` in field order. With `returning_id` the
    /// statement also asks for the generated `id`.
    pub fn insert_medical_record(record: NewMedicalRecord, returning_id: bool) -> Self {
        let sql = if returning_id {
            format!("{INSERT_MEDICAL_RECORD} RETURNING id")
        } else {
            INSERT_MEDICAL_RECORD.to_string()
        };

        Self {
            sql,
            args: vec![record.description, record.id_patient, record.id_user],
        }
    }

    pub fn to_body(&self) -> RecordResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| RecordError::Serialization(e.to_string()))
    }
}
