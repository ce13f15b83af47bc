use crate::{reconcile, validate_resume, validate_submission, AppState, Effect, JobPhase, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ResumeSelected(resume) => {
            let form = state.form_mut();
            match validate_resume(&resume) {
                Ok(()) => {
                    form.resume = Some(resume);
                    form.error = None;
                }
                Err(err) => {
                    form.resume = None;
                    form.error = Some(err);
                }
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::ResumeCleared => {
            if state.form_mut().resume.take().is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::UrlsChanged(raw) => {
            let form = state.form_mut();
            if form.urls_input != raw {
                form.urls_input = raw;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SubmitClicked => {
            if *state.phase() != JobPhase::NoJob || state.form().is_submitting() {
                return (state, Vec::new());
            }
            let form = state.form_mut();
            let checked = validate_submission(form.resume.as_ref(), &form.urls_input);
            let effects = match (checked, form.resume.clone()) {
                (Ok(()), Some(resume)) => {
                    form.error = None;
                    form.alert = None;
                    form.submitting = true;
                    vec![Effect::SubmitApplication {
                        resume,
                        urls: form.urls_input.clone(),
                    }]
                }
                (Err(err), _) => {
                    form.error = Some(err);
                    Vec::new()
                }
                (Ok(()), None) => Vec::new(),
            };
            state.mark_dirty();
            effects
        }
        Msg::SubmitSucceeded { job_id, notice } => {
            // Only the submission this form started may activate a job.
            if *state.phase() != JobPhase::NoJob || !state.form().is_submitting() {
                return (state, Vec::new());
            }
            state.activate(job_id.clone(), notice);
            state.mark_dirty();
            vec![Effect::StartPolling { job_id }]
        }
        Msg::SubmitFailed { message } => {
            let form = state.form_mut();
            if !form.submitting {
                return (state, Vec::new());
            }
            form.submitting = false;
            form.alert = Some(format!("Failed to start applications: {message}"));
            state.mark_dirty();
            Vec::new()
        }
        Msg::AlertDismissed => {
            if state.form_mut().alert.take().is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SnapshotReceived { job_id, snapshot } => {
            // A completion captured under a retired job must not touch anything.
            if !state.is_active(&job_id) {
                return (state, Vec::new());
            }
            let next = reconcile(state.board(), snapshot);
            let board_changed = state.replace_board(next);
            let focus_cleared = state.prune_focus();
            if board_changed || focus_cleared {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PollFailed { .. } => Vec::new(),
        Msg::LogsToggled { url } => {
            if state.active_job().is_some() {
                state.interaction_mut().toggle_expanded(&url);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::FocusRequested { url } => {
            if state.active_job().is_some()
                && state.board().has_live_view(&url)
                && state.interaction_mut().set_focused(Some(&url))
            {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::FocusClosed => {
            if state.interaction_mut().set_focused(None) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NewBatchClicked => match state.reset() {
            Some(job_id) => {
                state.mark_dirty();
                vec![Effect::StopPolling { job_id }]
            }
            None => Vec::new(),
        },
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
