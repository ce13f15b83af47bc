#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a resume file in the form.
    ResumeSelected(crate::ResumeFile),
    /// User removed the selected resume.
    ResumeCleared,
    /// User edited the URL list (newline-delimited).
    UrlsChanged(String),
    /// User submitted the form.
    SubmitClicked,
    /// Backend accepted the batch.
    SubmitSucceeded {
        job_id: crate::JobId,
        notice: Option<String>,
    },
    /// `/apply` failed (network or non-2xx).
    SubmitFailed { message: String },
    /// User acknowledged the submission alert.
    AlertDismissed,
    /// One poll fetch completed for the job captured when it was issued.
    SnapshotReceived {
        job_id: crate::JobId,
        snapshot: crate::StatusSnapshot,
    },
    /// One poll fetch failed; transient, never shown to the user.
    PollFailed {
        job_id: crate::JobId,
        message: String,
    },
    /// User toggled the log panel of a task.
    LogsToggled { url: String },
    /// User asked for the full-screen live view of a task.
    FocusRequested { url: String },
    /// User closed the full-screen live view.
    FocusClosed,
    /// User clicked "start new batch".
    NewBatchClicked,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
