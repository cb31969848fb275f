//! clap-based command-line interface.
//!
//! Defines the [`Cli`] struct with the [`Command`] subcommands
//! (protect, analyze, verify, health) and global flags
//! (--api-base, --interval-ms, --max-attempts, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// aegis — command-line client for the Aegis media protection API.
#[derive(Debug, Parser)]
#[command(name = "aegis", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the API deployment.
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Delay between job status reads, in milliseconds.
    #[arg(long, global = true)]
    pub interval_ms: Option<u64>,

    /// Maximum status reads before giving up (0 = poll until terminal).
    #[arg(long, global = true)]
    pub max_attempts: Option<u32>,

    /// Enable verbose logging.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Protect an image. Most methods enqueue a job and poll it to
    /// completion; `fawkes` runs synchronously.
    Protect {
        /// Image file to protect.
        file: PathBuf,

        /// Protection method (e.g. mist, glaze, fawkes).
        #[arg(long, default_value = "mist")]
        method: String,

        /// Owner tag attached to the submission.
        #[arg(long)]
        owner: Option<String>,
    },

    /// Analyze an audio file for synthesis artifacts (synchronous).
    Analyze {
        /// Audio file to analyze.
        file: PathBuf,
    },

    /// Look up a watermark by id (synchronous).
    Verify {
        /// Watermark identifier.
        id: String,
    },

    /// Probe the API liveness endpoint.
    Health {
        /// Keep probing and print every connectivity change.
        #[arg(long)]
        watch: bool,
    },
}
