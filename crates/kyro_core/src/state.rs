use std::fmt;

use crate::view_model::{
    AppViewModel, DashboardView, FocusView, FormView, Screen, StatusCounts, TaskView,
};
use crate::{count_urls, InteractionState, SubmissionForm, TaskBoard};

/// Opaque job identifier returned by `/apply`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Which job, if any, the monitor is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    NoJob,
    Active(JobId),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    phase: JobPhase,
    form: SubmissionForm,
    board: TaskBoard,
    interaction: InteractionState,
    notice: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &JobPhase {
        &self.phase
    }

    pub fn active_job(&self) -> Option<&JobId> {
        match &self.phase {
            JobPhase::Active(job_id) => Some(job_id),
            JobPhase::NoJob => None,
        }
    }

    /// True when `job_id` is the job currently being monitored.
    pub fn is_active(&self, job_id: &JobId) -> bool {
        self.active_job() == Some(job_id)
    }

    pub fn form(&self) -> &SubmissionForm {
        &self.form
    }

    pub fn board(&self) -> &TaskBoard {
        &self.board
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn view(&self) -> AppViewModel {
        let screen = match &self.phase {
            JobPhase::NoJob => Screen::Form(self.form_view()),
            JobPhase::Active(job_id) => Screen::Dashboard(self.dashboard_view(job_id)),
        };
        AppViewModel {
            screen,
            dirty: self.dirty,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn form_mut(&mut self) -> &mut SubmissionForm {
        &mut self.form
    }

    pub(crate) fn interaction_mut(&mut self) -> &mut InteractionState {
        &mut self.interaction
    }

    pub(crate) fn activate(&mut self, job_id: JobId, notice: Option<String>) {
        self.phase = JobPhase::Active(job_id);
        self.form.submitting = false;
        self.form.alert = None;
        self.board = TaskBoard::new();
        self.interaction = InteractionState::new();
        self.notice = notice;
    }

    /// Drops the job and everything derived from it; back to an empty form.
    pub(crate) fn reset(&mut self) -> Option<JobId> {
        let retired = match std::mem::take(&mut self.phase) {
            JobPhase::Active(job_id) => Some(job_id),
            JobPhase::NoJob => None,
        };
        self.form = SubmissionForm::default();
        self.board = TaskBoard::new();
        self.interaction = InteractionState::new();
        self.notice = None;
        retired
    }

    /// Installs a freshly reconciled board. Returns whether it differs.
    pub(crate) fn replace_board(&mut self, board: TaskBoard) -> bool {
        if self.board == board {
            return false;
        }
        self.board = board;
        true
    }

    /// Clears focus when the focused task no longer offers a live view.
    pub(crate) fn prune_focus(&mut self) -> bool {
        let stale = self
            .interaction
            .focused_url()
            .is_some_and(|url| !self.board.has_live_view(url));
        stale && self.interaction.set_focused(None)
    }

    fn form_view(&self) -> FormView {
        FormView {
            resume_name: self.form.resume.as_ref().map(|r| r.file_name.clone()),
            urls_input: self.form.urls_input.clone(),
            url_count: count_urls(&self.form.urls_input),
            error: self.form.error.map(|err| err.to_string()),
            alert: self.form.alert.clone(),
            submitting: self.form.submitting,
        }
    }

    fn dashboard_view(&self, job_id: &JobId) -> DashboardView {
        let mut counts = StatusCounts::default();
        let tasks: Vec<TaskView> = self
            .board
            .tasks()
            .map(|task| {
                counts.record(task.status);
                TaskView {
                    url: task.url.to_owned(),
                    status: task.status,
                    logs: task.logs.to_vec(),
                    expanded: self.interaction.is_expanded(task.url),
                    session_id: task.session_id.map(ToOwned::to_owned),
                    live_view_url: task.live_view_url.map(ToOwned::to_owned),
                }
            })
            .collect();

        let focused = self.interaction.focused_url().and_then(|url| {
            self.board.live_view_url(url).map(|address| FocusView {
                url: url.to_owned(),
                live_view_url: address.to_owned(),
            })
        });

        DashboardView {
            job_id: job_id.clone(),
            notice: self.notice.clone(),
            tasks,
            counts,
            focused,
        }
    }
}
