//! Kyro core: pure state machine, snapshot reconciler and view-model helpers.
mod effect;
mod interaction;
mod msg;
mod reconcile;
mod state;
mod submission;
mod update;
mod view_model;

pub use effect::Effect;
pub use interaction::InteractionState;
pub use msg::Msg;
pub use reconcile::{
    reconcile, replace_if_changed, StatusSnapshot, TaskBoard, TaskRecord, TaskStatus, UrlMap,
};
pub use state::{AppState, JobId, JobPhase};
pub use submission::{
    count_urls, validate_resume, validate_submission, ResumeFile, SubmissionForm, ValidationError,
    ACCEPTED_RESUME_EXTENSIONS,
};
pub use update::update;
pub use view_model::{
    AppViewModel, DashboardView, FocusView, FormView, Screen, StatusCounts, TaskView,
};
