//! Error types for the protection API client.
//!
//! Defines [`ApiError`] with variants for precondition violations, rejected
//! submissions, non-success responses and network-layer failures. Uses
//! `thiserror` to derive `Display` and `Error` from the `#[error(...)]`
//! attributes.

use thiserror::Error;

/// Errors that can occur while talking to the protection API.
///
/// Where a variant lands in the failure taxonomy depends on the call site:
/// a [`Network`](ApiError::Network) error is a submission failure at enqueue
/// time, a transient error on a poll tick, and a connectivity failure at the
/// health probe. The caller decides; nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The submission payload was empty. Reported before any request is made.
    #[error("empty payload: nothing to submit")]
    EmptyPayload,

    /// The enqueue endpoint rejected the submission (non-2xx). Polling must
    /// not be started after this.
    #[error("submission rejected (status {status}): {message}")]
    Submission { status: u16, message: String },

    /// Any other endpoint returned a non-2xx status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Underlying network failure (DNS, refused connection, decode error).
    /// Wraps the original `reqwest` error via `#[from]`.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}
