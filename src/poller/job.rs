use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message reported when a job fails and the server omits the error field.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Unknown error";

/// Lifecycle status of a server-side job, as reported by the status endpoint.
///
/// Transitions are driven entirely by the remote system and move
/// monotonically toward a terminal state; once `Completed` or `Failed` has
/// been observed the poller stops reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Handle to a job accepted by the enqueue endpoint.
///
/// Wraps the server-issued opaque identifier; the client never mints ids of
/// its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub id: String,
}

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Configuration for a poll session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Delay between status reads, in milliseconds.
    pub interval_ms: u64,
    /// Maximum number of status reads before the session gives up.
    /// `None` polls until a terminal status arrives.
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            max_attempts: Some(30),
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.interval_ms)
    }
}

/// One observed status, delivered to the session owner on every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: JobStatus,
    pub progress: Option<f64>,
}

/// How a poll session ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PollOutcome {
    /// The job completed; the result endpoint was read once.
    Completed {
        /// Direct-download URL for the job artifact.
        result_url: String,
        /// Parsed result document, if the final read succeeded.
        data: Option<Value>,
    },
    /// The job reached the `failed` status. `message` is the server's error
    /// or [`DEFAULT_FAILURE_MESSAGE`] when the server omitted one.
    Failed { message: String },
    /// The attempt ceiling was reached before a terminal status appeared.
    TimedOut { attempts: u32 },
}

impl PollOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PollOutcome::Completed { .. })
    }
}

/// Summary record produced when a poll session resolves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollReport {
    pub job_id: String,
    pub outcome: PollOutcome,
    /// Number of status reads performed.
    pub attempts: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl PollReport {
    pub fn new(
        job_id: String,
        outcome: PollOutcome,
        attempts: u32,
        started_at: DateTime<Utc>,
    ) -> Self {
        let finished_at = Utc::now();
        let duration = finished_at - started_at;
        Self {
            job_id,
            outcome,
            attempts,
            started_at,
            finished_at,
            duration_ms: duration.num_milliseconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&JobStatus::Queued).unwrap(), "\"queued\"");
        assert_eq!(
            serde_json::from_str::<JobStatus>("\"completed\"").unwrap(),
            JobStatus::Completed
        );
    }

    #[test]
    fn only_completed_and_failed_are_terminal() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn poll_config_defaults() {
        let config = PollConfig::default();
        assert_eq!(config.interval_ms, 2000);
        assert_eq!(config.max_attempts, Some(30));
        assert_eq!(config.interval(), std::time::Duration::from_millis(2000));
    }

    #[test]
    fn report_records_attempts_and_duration() {
        let started = Utc::now();
        let report = PollReport::new(
            "job-1".into(),
            PollOutcome::Failed {
                message: "bad input".into(),
            },
            4,
            started,
        );
        assert_eq!(report.job_id, "job-1");
        assert_eq!(report.attempts, 4);
        assert!(report.duration_ms >= 0);
        assert!(!report.outcome.is_success());
    }

    #[test]
    fn report_serializes_to_json() {
        let report = PollReport::new(
            "job-2".into(),
            PollOutcome::Completed {
                result_url: "http://api/result/job-2".into(),
                data: Some(serde_json::json!({"path": "out.png"})),
            },
            2,
            Utc::now(),
        );
        let json = serde_json::to_string(&report).unwrap();
        let parsed: PollReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.job_id, "job-2");
        assert!(parsed.outcome.is_success());
    }
}
