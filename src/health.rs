//! Periodic liveness probe for the remote API.
//!
//! Mirrors the connectivity badge of the reference deployment: a recurring
//! `GET /health` that flips an indicator between connected and disconnected.
//! The probe is completely independent of job polling; a failed probe never
//! touches a poll session.

use std::fmt;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::api::ApiClient;

/// Current reachability of the API, as seen by the last probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Connected,
    Disconnected,
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connectivity::Connected => write!(f, "● Connected"),
            Connectivity::Disconnected => write!(f, "○ Disconnected"),
        }
    }
}

/// Starts health monitors.
pub struct HealthMonitor;

impl HealthMonitor {
    /// Spawn a recurring probe against the liveness endpoint.
    ///
    /// The first probe fires immediately, then one per interval. Each result
    /// is published on a watch channel; the task exits on its own once the
    /// handle (and with it every receiver) is dropped.
    pub fn start(client: ApiClient, interval: Duration) -> HealthHandle {
        let (tx, rx) = watch::channel(Connectivity::Disconnected);

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let next = match client.health().await {
                    Ok(()) => Connectivity::Connected,
                    Err(err) => {
                        debug!(error = %err, "health probe failed");
                        Connectivity::Disconnected
                    }
                };
                if *tx.borrow() != next {
                    info!(connectivity = %next, "connectivity changed");
                }
                if tx.send(next).is_err() {
                    break;
                }
            }
        });

        HealthHandle { rx, task }
    }
}

/// Owned handle to a running health monitor.
pub struct HealthHandle {
    rx: watch::Receiver<Connectivity>,
    task: JoinHandle<()>,
}

impl HealthHandle {
    /// Indicator as of the most recent probe.
    pub fn connectivity(&self) -> Connectivity {
        *self.rx.borrow()
    }

    /// Wait for the next probe result and return it.
    pub async fn changed(&mut self) -> Connectivity {
        let _ = self.rx.changed().await;
        *self.rx.borrow()
    }

    /// Stop probing. Consumes the handle.
    pub fn stop(self) {
        self.task.abort();
    }
}
