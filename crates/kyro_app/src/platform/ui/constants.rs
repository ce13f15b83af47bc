use std::time::Duration;

/// How long the input loop waits before pumping engine events again.
pub const TICK_INTERVAL: Duration = Duration::from_millis(75);

pub const RULE: &str = "------------------------------------------------------------";

pub const WAITING_FOR_TASKS: &str = "Waiting for tasks to start...";
pub const WAITING_FOR_LOGS: &str = "Waiting for logs...";
pub const LIVE_VIEW_COMPLETED: &str = "Application Completed";
pub const LIVE_VIEW_PENDING: &str = "Initializing Session...";

pub const FORM_HINT: &str = "Commands: resume <path>, url <line>, urls clear, submit, help, quit";
pub const DASHBOARD_HINT: &str = "Commands: logs <n>, focus <n>, close, new, help, quit";

pub const HELP_TEXT: &str = "\
resume <path>   select a resume (PDF, DOC, DOCX, TXT)
resume clear    remove the selected resume
url <line>      append a target URL line
urls clear      empty the URL list
submit          start the batch
dismiss         acknowledge a submission alert
logs <task>     show or hide a task's logs
focus <task>    open a task's live view
close           leave the live view
new             abandon the batch and return to the form
refresh         redraw the screen
quit            exit

<task> is a 1-based row number or the task URL.";
