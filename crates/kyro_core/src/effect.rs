use crate::{JobId, ResumeFile};

/// Side effects requested by [`crate::update`]; executed by the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Upload the resume and URL list as one `/apply` request.
    SubmitApplication { resume: ResumeFile, urls: String },
    /// Begin the status poll schedule for a freshly acquired job.
    StartPolling { job_id: JobId },
    /// Cancel the poll schedule (and any in-flight fetch) of a retired job.
    StopPolling { job_id: JobId },
}
