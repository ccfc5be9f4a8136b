use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::capture::CapturedBody;
use crate::error::{RecordError, RecordResult};

/// Body returned by the query service, e.g. `{"data": [{"id": 101}]}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct QueryServiceResponse(pub Map<String, Value>);

impl QueryServiceResponse {
    pub fn decode(body: &CapturedBody) -> RecordResult<Self> {
        body.decode_json()
            .map_err(|e| RecordError::ResponseDecode(e.to_string()))
    }

    /// The `id` column of the first row in `data`.
    pub fn record_id(&self) -> RecordResult<&Value> {
        let first_row = self
            .0
            .get("data")
            .and_then(Value::as_array)
            .and_then(|rows| rows.first())
            .ok_or(RecordError::MissingResultData)?;

        first_row
            .as_object()
            .ok_or(RecordError::MalformedRow)?
            .get("id")
            .ok_or(RecordError::MissingIdentifier)
    }
}
