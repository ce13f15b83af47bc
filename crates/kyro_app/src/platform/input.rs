//! Terminal command parsing.

use std::path::PathBuf;

use kyro_core::DashboardView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Resume(PathBuf),
    ClearResume,
    Url(String),
    ClearUrls,
    Submit,
    Dismiss,
    Logs(TaskRef),
    Focus(TaskRef),
    Close,
    NewBatch,
    Help,
    Refresh,
    Quit,
}

/// A task named on the command line, either by row number or by URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRef {
    Index(usize),
    Url(String),
}

impl TaskRef {
    fn parse(raw: &str) -> Self {
        match raw.parse::<usize>() {
            Ok(index) => TaskRef::Index(index),
            Err(_) => TaskRef::Url(raw.to_string()),
        }
    }

    /// URL of the referenced task on the dashboard. Rows are numbered from 1.
    pub fn resolve(&self, dashboard: &DashboardView) -> Option<String> {
        match self {
            TaskRef::Index(index) => index
                .checked_sub(1)
                .and_then(|i| dashboard.tasks.get(i))
                .map(|task| task.url.clone()),
            TaskRef::Url(url) => dashboard.task(url).map(|task| task.url.clone()),
        }
    }
}

/// `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match (word.to_ascii_lowercase().as_str(), rest) {
        ("resume", "") => return Err("usage: resume <path> | resume clear".to_string()),
        ("resume", "clear") => Command::ClearResume,
        ("resume", path) => Command::Resume(PathBuf::from(path)),
        ("url", "") => return Err("usage: url <line>".to_string()),
        ("url", text) => Command::Url(text.to_string()),
        ("urls", "clear") => Command::ClearUrls,
        ("submit", "") => Command::Submit,
        ("dismiss" | "ok", "") => Command::Dismiss,
        ("logs", "") => return Err("usage: logs <task>".to_string()),
        ("logs", task) => Command::Logs(TaskRef::parse(task)),
        ("focus", "") => return Err("usage: focus <task>".to_string()),
        ("focus", task) => Command::Focus(TaskRef::parse(task)),
        ("close", "") => Command::Close,
        ("new", "") => Command::NewBatch,
        ("help" | "?", "") => Command::Help,
        ("refresh", "") => Command::Refresh,
        ("quit" | "exit", "") => Command::Quit,
        _ => return Err(format!("unknown command: {line} (type `help`)")),
    };
    Ok(Some(command))
}
