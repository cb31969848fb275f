pub mod job;
pub mod session;

pub use job::{
    DEFAULT_FAILURE_MESSAGE, JobHandle, JobStatus, PollConfig, PollOutcome, PollReport,
    StatusUpdate,
};
pub use session::{PollSession, Poller, PollerError};
