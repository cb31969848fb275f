//! Terminal output — spinner and colored status lines.
//!
//! Uses `indicatif` for the progress spinner and `console` for color
//! styling. [`PollProgress`] visually tracks one poll session from upload
//! to its terminal outcome.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::health::Connectivity;
use crate::poller::{JobStatus, PollOutcome, PollReport, StatusUpdate};

/// Visual indicator for a running poll session.
pub struct PollProgress {
    pb: ProgressBar,
    green: Style,
    red: Style,
    yellow: Style,
}

impl PollProgress {
    /// Start the spinner for a freshly enqueued job.
    pub fn start(job_id: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(format!("Queued (waiting for worker) — job {job_id}"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Update the spinner message to reflect the latest observed status.
    pub fn update(&self, update: &StatusUpdate) {
        let message = match (update.status, update.progress) {
            (JobStatus::Processing, Some(progress)) => {
                format!("Processing... {progress:.0}%")
            }
            (JobStatus::Processing, None) => "Processing...".to_string(),
            (status, _) => status.to_string(),
        };
        self.pb.set_message(message);
    }

    /// Stop the spinner and print the terminal outcome.
    pub fn complete(&self, report: &PollReport) {
        self.pb.finish_and_clear();
        match &report.outcome {
            PollOutcome::Completed { result_url, .. } => {
                println!("  {} Finished! Result: {result_url}", self.green.apply_to("✓"));
            }
            PollOutcome::Failed { message } => {
                println!("  {} Job failed: {message}", self.red.apply_to("✗"));
            }
            PollOutcome::TimedOut { attempts } => {
                println!(
                    "  {} Gave up after {attempts} status reads",
                    self.yellow.apply_to("⏱")
                );
            }
        }
    }

    /// Print the session summary as formatted JSON.
    pub fn print_report(&self, report: &PollReport) {
        let status_style = if report.outcome.is_success() {
            &self.green
        } else {
            &self.red
        };
        println!();
        println!("{}", status_style.apply_to("─── Poll Report ───"));
        println!(
            "{}",
            serde_json::to_string_pretty(report).unwrap_or_default()
        );
    }
}

/// Print the connectivity badge the way the dashboards render it.
pub fn print_connectivity(connectivity: Connectivity) {
    let style = match connectivity {
        Connectivity::Connected => Style::new().green(),
        Connectivity::Disconnected => Style::new().red(),
    };
    println!("{}", style.apply_to(connectivity));
}
