use std::fmt::Write;

use kyro_core::{AppViewModel, DashboardView, FormView, Screen, TaskStatus, TaskView};

use super::constants::*;

/// Full-screen text for the current view. `clock` is printed in the dashboard header.
pub fn render(view: &AppViewModel, clock: &str) -> String {
    match &view.screen {
        Screen::Form(form) => render_form(form),
        Screen::Dashboard(dashboard) => render_dashboard(dashboard, clock),
    }
}

fn render_form(form: &FormView) -> String {
    let mut out = String::new();
    line(&mut out, "Kyro | New batch");
    line(&mut out, RULE);
    line(
        &mut out,
        &format!(
            "Resume: {}",
            form.resume_name.as_deref().unwrap_or("(none selected)")
        ),
    );
    line(&mut out, &format!("URLs:   {}", form.url_count));
    for url in form.urls_input.lines().filter(|l| !l.trim().is_empty()) {
        line(&mut out, &format!("  {url}"));
    }
    if let Some(error) = &form.error {
        line(&mut out, &format!("! {error}"));
    }
    if let Some(alert) = &form.alert {
        line(&mut out, &format!("!! {alert} (type `dismiss`)"));
    }
    if form.submitting {
        line(&mut out, "Starting applications...");
    }
    line(&mut out, RULE);
    line(&mut out, FORM_HINT);
    out
}

fn render_dashboard(view: &DashboardView, clock: &str) -> String {
    let mut out = String::new();
    let counts = &view.counts;
    line(
        &mut out,
        &format!(
            "Kyro | Job {} | {} tasks: {} pending, {} running, {} completed, {} failed | {}",
            view.job_id,
            counts.total(),
            counts.pending,
            counts.running,
            counts.completed,
            counts.failed,
            clock
        ),
    );
    if let Some(notice) = &view.notice {
        line(&mut out, notice);
    }
    line(&mut out, RULE);

    if let Some(focus) = &view.focused {
        line(&mut out, &format!("LIVE VIEW  {}", focus.url));
        line(&mut out, &format!("  {}", focus.live_view_url));
        line(&mut out, "  (type `close` to return)");
        line(&mut out, RULE);
    }

    if view.tasks.is_empty() {
        line(&mut out, WAITING_FOR_TASKS);
    }
    for (index, task) in view.tasks.iter().enumerate() {
        render_task(&mut out, index + 1, task);
    }

    line(&mut out, RULE);
    line(&mut out, DASHBOARD_HINT);
    out
}

fn render_task(out: &mut String, number: usize, task: &TaskView) {
    line(
        out,
        &format!(
            "{number:>2}. {} {}  {}",
            status_marker(task.status),
            task.url,
            task.status.as_str()
        ),
    );
    if let Some(session_id) = &task.session_id {
        line(out, &format!("      session: {session_id}"));
    }
    match (&task.live_view_url, task.status) {
        (Some(live), _) => line(out, &format!("      live view: {live}  (focus {number})")),
        (None, TaskStatus::Completed) => line(out, &format!("      {LIVE_VIEW_COMPLETED}")),
        (None, _) => line(out, &format!("      {LIVE_VIEW_PENDING}")),
    }
    if task.expanded {
        if task.logs.is_empty() {
            line(out, &format!("      {WAITING_FOR_LOGS}"));
        }
        for entry in &task.logs {
            line(out, &format!("      | {entry}"));
        }
    } else if !task.logs.is_empty() {
        line(
            out,
            &format!("      {} log lines (logs {number})", task.logs.len()),
        );
    }
}

fn status_marker(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "[..]",
        TaskStatus::Running => "[>>]",
        TaskStatus::Completed => "[ok]",
        TaskStatus::Failed => "[!!]",
    }
}

fn line(out: &mut String, text: &str) {
    let _ = writeln!(out, "{text}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use kyro_core::{FocusView, JobId, StatusCounts};

    fn task(url: &str, status: TaskStatus) -> TaskView {
        TaskView {
            url: url.to_string(),
            status,
            logs: Vec::new(),
            expanded: false,
            session_id: None,
            live_view_url: None,
        }
    }

    fn dashboard(tasks: Vec<TaskView>) -> AppViewModel {
        let mut counts = StatusCounts::default();
        for task in &tasks {
            match task.status {
                TaskStatus::Pending => counts.pending += 1,
                TaskStatus::Running => counts.running += 1,
                TaskStatus::Completed => counts.completed += 1,
                TaskStatus::Failed => counts.failed += 1,
            }
        }
        AppViewModel {
            screen: Screen::Dashboard(DashboardView {
                job_id: JobId::from("job-42"),
                notice: None,
                tasks,
                counts,
                focused: None,
            }),
            dirty: true,
        }
    }

    #[test]
    fn form_shows_validation_error_and_count() {
        let view = AppViewModel {
            screen: Screen::Form(FormView {
                resume_name: Some("cv.pdf".into()),
                urls_input: "a.com\n\nb.com".into(),
                url_count: 2,
                error: Some("Please enter at least one URL".into()),
                alert: None,
                submitting: false,
            }),
            dirty: true,
        };
        let text = render(&view, "12:00:00");
        assert!(text.contains("Resume: cv.pdf"));
        assert!(text.contains("URLs:   2"));
        assert!(text.contains("! Please enter at least one URL"));
        assert!(!text.contains("Starting applications"));
    }

    #[test]
    fn empty_dashboard_waits_for_tasks() {
        let text = render(&dashboard(Vec::new()), "09:15:00");
        assert!(text.contains("Job job-42"));
        assert!(text.contains("09:15:00"));
        assert!(text.contains(WAITING_FOR_TASKS));
    }

    #[test]
    fn live_view_placeholders_follow_status() {
        let mut live = task("a.com", TaskStatus::Running);
        live.live_view_url = Some("https://live/a".into());
        let text = render(
            &dashboard(vec![
                live,
                task("b.com", TaskStatus::Completed),
                task("c.com", TaskStatus::Pending),
            ]),
            "",
        );
        assert!(text.contains(" 1. [>>] a.com  running"));
        assert!(text.contains("live view: https://live/a  (focus 1)"));
        assert!(text.contains(" 2. [ok] b.com  completed"));
        assert!(text.contains(LIVE_VIEW_COMPLETED));
        assert!(text.contains(LIVE_VIEW_PENDING));
        assert!(!text.contains(WAITING_FOR_TASKS));
    }

    #[test]
    fn expanded_task_lists_logs_or_placeholder() {
        let mut with_logs = task("a.com", TaskStatus::Running);
        with_logs.expanded = true;
        with_logs.logs = vec!["Navigating".into(), "Filling form".into()];
        let mut without_logs = task("b.com", TaskStatus::Pending);
        without_logs.expanded = true;

        let text = render(&dashboard(vec![with_logs, without_logs]), "");
        assert!(text.contains("| Navigating"));
        assert!(text.contains("| Filling form"));
        assert!(text.contains(WAITING_FOR_LOGS));
    }

    #[test]
    fn focused_task_gets_overlay() {
        let mut view = dashboard(vec![task("a.com", TaskStatus::Running)]);
        if let Screen::Dashboard(dashboard) = &mut view.screen {
            dashboard.focused = Some(FocusView {
                url: "a.com".into(),
                live_view_url: "https://live/a".into(),
            });
        }
        let text = render(&view, "");
        assert!(text.contains("LIVE VIEW  a.com"));
        assert!(text.contains("  https://live/a"));
    }
}
