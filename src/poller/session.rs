use chrono::Utc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use super::job::{
    DEFAULT_FAILURE_MESSAGE, JobHandle, JobStatus, PollConfig, PollOutcome, PollReport,
    StatusUpdate,
};
use crate::api::ApiClient;

/// Errors surfaced when resolving a poll session.
#[derive(Debug, Error)]
pub enum PollerError {
    /// The session's task was aborted before it reached an outcome.
    #[error("poll session was cancelled before completion")]
    Cancelled,
}

/// Starts poll sessions for enqueued jobs.
pub struct Poller;

impl Poller {
    /// Begin polling the status endpoint for the given job.
    ///
    /// Spawns one owned task that reads the status once per interval and
    /// pushes every observed status to the session's update channel. The
    /// task stops on the first terminal status (after a single result read
    /// when the job completed), or once the attempt ceiling is reached.
    /// A failed read on a single tick is logged and the next tick happens
    /// anyway; one bad tick must not abort an otherwise healthy job.
    pub fn start(client: ApiClient, handle: JobHandle, config: PollConfig) -> PollSession {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let job_id = handle.id.clone();

        let task = tokio::spawn(async move {
            let started_at = Utc::now();
            // First read happens one full interval after enqueue, like the
            // recurring timer in the reference deployment.
            let start = time::Instant::now() + config.interval();
            let mut ticker = time::interval_at(start, config.interval());
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut attempts = 0u32;

            loop {
                ticker.tick().await;
                attempts += 1;

                match client.job_status(&handle.id).await {
                    Ok(report) => {
                        let _ = updates_tx.send(StatusUpdate {
                            status: report.status,
                            progress: report.progress,
                        });
                        match report.status {
                            JobStatus::Completed => {
                                let data = match client.fetch_result(&handle.id).await {
                                    Ok(doc) => Some(doc),
                                    Err(err) => {
                                        warn!(job_id = %handle.id, error = %err, "result fetch failed");
                                        None
                                    }
                                };
                                let outcome = PollOutcome::Completed {
                                    result_url: client.result_url(&handle.id),
                                    data,
                                };
                                return PollReport::new(handle.id, outcome, attempts, started_at);
                            }
                            JobStatus::Failed => {
                                let message = report
                                    .error
                                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
                                return PollReport::new(
                                    handle.id,
                                    PollOutcome::Failed { message },
                                    attempts,
                                    started_at,
                                );
                            }
                            JobStatus::Queued | JobStatus::Processing => {}
                        }
                    }
                    Err(err) => {
                        warn!(job_id = %handle.id, error = %err, "status read failed, retrying on next tick");
                    }
                }

                if let Some(max) = config.max_attempts
                    && attempts >= max
                {
                    debug!(job_id = %handle.id, attempts, "attempt ceiling reached");
                    return PollReport::new(
                        handle.id,
                        PollOutcome::TimedOut { attempts },
                        attempts,
                        started_at,
                    );
                }
            }
        });

        PollSession {
            job_id,
            updates: updates_rx,
            task,
        }
    }
}

/// An in-flight poll session for one job.
///
/// Owns the recurring task outright: there is no ambient timer to forget.
/// The observed statuses form a finite, non-restartable sequence consumed
/// via [`next_update`](PollSession::next_update); the terminal outcome is
/// obtained from [`outcome`](PollSession::outcome). Sessions for different
/// jobs are fully independent.
pub struct PollSession {
    job_id: String,
    updates: mpsc::UnboundedReceiver<StatusUpdate>,
    task: JoinHandle<PollReport>,
}

impl PollSession {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Next observed status, or `None` once the session has resolved and
    /// the channel drained.
    pub async fn next_update(&mut self) -> Option<StatusUpdate> {
        self.updates.recv().await
    }

    /// Wait for the session to reach its terminal outcome.
    pub async fn outcome(self) -> Result<PollReport, PollerError> {
        match self.task.await {
            Ok(report) => Ok(report),
            Err(err) if err.is_cancelled() => Err(PollerError::Cancelled),
            Err(err) => std::panic::resume_unwind(err.into_panic()),
        }
    }

    /// Stop polling immediately. Consumes the session, so cancellation can
    /// happen at most once.
    pub fn cancel(self) {
        self.task.abort();
    }
}
