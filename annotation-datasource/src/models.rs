//! Wire types exchanged with the orchestration layer and the annotation API.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use std::collections::{BTreeMap, HashMap};

use crate::error::{ErrorKind, QueryError};
use crate::frame::Frame;

/// Key of the bearer credential inside the decrypted secure settings.
pub const API_KEY: &str = "apiKey";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// A single query of a batch. `json` is kept undecoded so a malformed body
/// only fails its own query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuery {
    pub ref_id: String,
    #[serde(deserialize_with = "raw_json")]
    pub json: Bytes,
    pub time_range: TimeRange,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSettings {
    #[serde(default = "empty_object", deserialize_with = "raw_json")]
    pub json_data: Bytes,
    #[serde(default)]
    pub decrypted_secure_json_data: HashMap<String, String>,
}

impl Default for InstanceSettings {
    fn default() -> Self {
        InstanceSettings {
            json_data: empty_object(),
            decrypted_secure_json_data: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginContext {
    #[serde(default)]
    pub data_source_instance_settings: InstanceSettings,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDataRequest {
    #[serde(default)]
    pub plugin_context: PluginContext,
    pub queries: Vec<DataQuery>,
}

#[derive(Debug, Default, Serialize)]
pub struct QueryDataResponse {
    pub results: BTreeMap<String, QueryResult>,
}

/// Outcome of one query. Failures still carry the empty, schema-declared frame.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum QueryResult {
    Success {
        frames: Vec<Frame>,
    },
    Error {
        kind: ErrorKind,
        error: String,
        frames: Vec<Frame>,
    },
}

impl QueryResult {
    pub fn failure(err: &QueryError) -> Self {
        QueryResult::Error {
            kind: err.kind(),
            error: err.to_string(),
            frames: vec![Frame::annotations()],
        }
    }

    pub fn frames(&self) -> &[Frame] {
        match self {
            QueryResult::Success { frames } | QueryResult::Error { frames, .. } => frames,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            QueryResult::Success { .. } => None,
            QueryResult::Error { kind, .. } => Some(*kind),
        }
    }
}

impl From<Result<Frame, QueryError>> for QueryResult {
    fn from(res: Result<Frame, QueryError>) -> Self {
        match res {
            Ok(frame) => QueryResult::Success {
                frames: vec![frame],
            },
            Err(e) => QueryResult::failure(&e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Ok,
    // Part of the health wire contract; the health check never reports it yet.
    #[allow(dead_code)]
    Error,
}

#[derive(Debug, Serialize)]
pub struct CheckHealthResult {
    pub status: HealthStatus,
    pub message: String,
}

/// Per-datasource options, decoded from `jsonData`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionOptions {
    #[serde(default, deserialize_with = "null_as_default")]
    pub server_url: String,
}

/// Query body as written by the query editor.
#[derive(Debug, Default, Deserialize)]
pub struct QueryModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: String,
}

/// One element of the annotation API's response array. Missing or null
/// fields decode as their zero value, so `time` falls back to the epoch.
#[derive(Debug, Deserialize)]
pub struct AnnotationRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    #[allow(dead_code)]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[allow(dead_code)]
    pub tags: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn raw_json<'de, D>(deserializer: D) -> Result<Bytes, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    Ok(Bytes::copy_from_slice(raw.get().as_bytes()))
}

fn empty_object() -> Bytes {
    Bytes::from_static(b"{}")
}
