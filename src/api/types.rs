//! Wire types for the protection API.
//!
//! All structs derive `Serialize`/`Deserialize` matching the JSON bodies
//! exchanged with the deployment's enqueue, status and result endpoints.

use serde::{Deserialize, Serialize};

use crate::poller::JobStatus;

/// A payload to be sent to the API, either to the asynchronous queue or to
/// one of the synchronous endpoints.
///
/// The binary payload travels as a multipart file part; every metadata field
/// becomes an additional text part on the same form. A `Submission` is
/// immutable once handed to the client.
#[derive(Debug, Clone)]
pub struct Submission {
    /// Name of the multipart file part ("image", "audio", ...).
    pub part_name: String,
    /// File name reported to the server.
    pub file_name: String,
    /// Raw file contents. Must be non-empty; the client rejects an empty
    /// payload before any network traffic happens.
    pub payload: Vec<u8>,
    /// String metadata fields (processing method, owner tag, ...).
    pub fields: Vec<(String, String)>,
}

impl Submission {
    pub fn new(file_name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            part_name: "file".to_string(),
            file_name: file_name.into(),
            payload,
            fields: Vec::new(),
        }
    }

    /// Override the name of the multipart file part.
    pub fn part_name(mut self, name: impl Into<String>) -> Self {
        self.part_name = name.into();
        self
    }

    /// Attach a string metadata field.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }
}

/// Response body of the enqueue endpoint: `{ "id": "..." }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnqueueResponse {
    /// Server-issued opaque job identifier.
    pub id: String,
}

/// Response body of the status endpoint:
/// `{ "status": "...", "error": ..., "progress": ... }`.
///
/// `error` is only populated on failed jobs, and even then the server may
/// omit it. `progress` is an optional percentage for long-running jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
}
