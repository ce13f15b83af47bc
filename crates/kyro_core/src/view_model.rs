use crate::{JobId, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub screen: Screen,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Form(FormView),
    Dashboard(DashboardView),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormView {
    pub resume_name: Option<String>,
    pub urls_input: String,
    pub url_count: usize,
    /// Inline validation message.
    pub error: Option<String>,
    /// Blocking alert after a failed submission.
    pub alert: Option<String>,
    pub submitting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub job_id: JobId,
    pub notice: Option<String>,
    pub tasks: Vec<TaskView>,
    pub counts: StatusCounts,
    pub focused: Option<FocusView>,
}

impl DashboardView {
    pub fn task(&self, url: &str) -> Option<&TaskView> {
        self.tasks.iter().find(|task| task.url == url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub url: String,
    pub status: TaskStatus,
    pub logs: Vec<String>,
    pub expanded: bool,
    pub session_id: Option<String>,
    pub live_view_url: Option<String>,
}

impl TaskView {
    /// Whether the full-screen ("expand") affordance is offered.
    pub fn can_focus(&self) -> bool {
        self.live_view_url.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusView {
    pub url: String,
    pub live_view_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub pending: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
}

impl StatusCounts {
    pub(crate) fn record(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Pending => self.pending += 1,
            TaskStatus::Running => self.running += 1,
            TaskStatus::Completed => self.completed += 1,
            TaskStatus::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.running + self.completed + self.failed
    }
}
