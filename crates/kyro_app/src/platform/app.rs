use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;

use anyhow::Context;
use clap::Parser;
use engine_logging::{engine_debug, engine_info, engine_warn};
use kyro_core::{update, AppState, AppViewModel, Msg, ResumeFile, Screen};

use super::config::{Cli, Settings};
use super::effects::EffectRunner;
use super::input::{parse_command, Command, TaskRef};
use super::ui;

pub fn run_app() -> anyhow::Result<()> {
    let settings = Settings::load(Cli::parse()).context("loading configuration")?;
    engine_logging::initialize(
        settings.log_destination,
        settings.log_level,
        Some(&settings.log_file),
    );
    engine_info!("Kyro starting against {}", settings.api.base_url);

    let effects = EffectRunner::new(settings.api.clone())
        .with_context(|| format!("invalid backend address {}", settings.api.base_url))?;
    effects.check_health();

    let mut app = App::new(effects);
    app.apply_startup(&settings);
    app.flush(true);

    let lines = spawn_stdin_reader();
    let mut stdin_open = true;
    loop {
        app.pump_engine();

        if !stdin_open {
            thread::sleep(ui::constants::TICK_INTERVAL);
            app.dispatch(Msg::Tick);
            app.flush(false);
            continue;
        }

        match lines.recv_timeout(ui::constants::TICK_INTERVAL) {
            Ok(line) => match parse_command(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => app.execute(command),
                Ok(None) => {}
                Err(message) => app.say(&message),
            },
            Err(RecvTimeoutError::Timeout) => app.dispatch(Msg::Tick),
            Err(RecvTimeoutError::Disconnected) => {
                engine_debug!("stdin closed; monitoring continues until interrupted");
                stdin_open = false;
            }
        }
        app.flush(false);
    }

    engine_info!("Kyro exiting");
    Ok(())
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

struct App {
    state: AppState,
    effects: EffectRunner,
}

impl App {
    fn new(effects: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            effects,
        }
    }

    fn apply_startup(&mut self, settings: &Settings) {
        if let Some(path) = &settings.resume {
            self.select_resume(path);
        }
        if !settings.urls.is_empty() {
            self.dispatch(Msg::UrlsChanged(settings.urls.clone()));
        }
        if settings.auto_submit {
            self.dispatch(Msg::SubmitClicked);
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.effects.enqueue(effects);
    }

    fn pump_engine(&mut self) {
        while let Some(msg) = self.effects.next_msg() {
            self.dispatch(msg);
        }
    }

    /// Redraws when anything changed since the last frame, or always when `force` is set.
    fn flush(&mut self, force: bool) {
        if self.state.consume_dirty() || force {
            let view = self.state.view();
            let clock = chrono::Local::now().format("%H:%M:%S").to_string();
            print_screen(&ui::render::render(&view, &clock));
        }
    }

    fn say(&self, message: &str) {
        println!("{message}");
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Resume(path) => self.select_resume(&path),
            Command::ClearResume => self.dispatch(Msg::ResumeCleared),
            Command::Url(text) => {
                let mut urls = self.state.form().urls_input().to_string();
                if !urls.is_empty() && !urls.ends_with('\n') {
                    urls.push('\n');
                }
                urls.push_str(&text);
                self.dispatch(Msg::UrlsChanged(urls));
            }
            Command::ClearUrls => self.dispatch(Msg::UrlsChanged(String::new())),
            Command::Submit => self.dispatch(Msg::SubmitClicked),
            Command::Dismiss => self.dispatch(Msg::AlertDismissed),
            Command::Logs(task) => {
                if let Some(url) = self.resolve_task(&task) {
                    self.dispatch(Msg::LogsToggled { url });
                }
            }
            Command::Focus(task) => {
                if let Some(url) = self.resolve_task(&task) {
                    let has_live_view = self.state.board().has_live_view(&url);
                    self.dispatch(Msg::FocusRequested { url });
                    if !has_live_view {
                        self.say("That task has no live view yet.");
                    }
                }
            }
            Command::Close => self.dispatch(Msg::FocusClosed),
            Command::NewBatch => self.dispatch(Msg::NewBatchClicked),
            Command::Help => self.say(ui::constants::HELP_TEXT),
            Command::Refresh => self.flush(true),
            Command::Quit => {}
        }
    }

    fn resolve_task(&self, task: &TaskRef) -> Option<String> {
        let AppViewModel {
            screen: Screen::Dashboard(dashboard),
            ..
        } = self.state.view()
        else {
            self.say("No batch is running.");
            return None;
        };
        let url = task.resolve(&dashboard);
        if url.is_none() {
            self.say("No such task.");
        }
        url
    }

    fn select_resume(&mut self, path: &Path) {
        match load_resume(path) {
            Ok(resume) => self.dispatch(Msg::ResumeSelected(resume)),
            Err(err) => {
                engine_warn!("Could not read resume {:?}: {:#}", path, err);
                self.say(&format!("Could not read {}: {err:#}", path.display()));
            }
        }
    }
}

fn load_resume(path: &Path) -> anyhow::Result<ResumeFile> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let resume = ResumeFile::new(file_name, bytes);
    Ok(match content_type_for(path) {
        Some(content_type) => resume.with_content_type(content_type),
        None => resume,
    })
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "pdf" => Some("application/pdf"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "doc" => Some("application/msword"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

fn print_screen(text: &str) {
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout);
    let _ = stdout.write_all(text.as_bytes());
    let _ = stdout.flush();
}
