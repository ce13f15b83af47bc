use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_error, engine_info, engine_warn};
use kyro_core::{JobId, ResumeFile};

use crate::poller::Poller;
use crate::sink::ChannelEventSink;
use crate::{ApiError, ApiSettings, EngineEvent, EventSink, ReqwestApi, StatusApi};

enum EngineCommand {
    Submit { resume: ResumeFile, urls: String },
    StartPolling { job_id: JobId },
    StopPolling { job_id: JobId },
    CheckHealth,
}

/// Owns the IO thread. Commands go in, [`EngineEvent`]s come out.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let api = Arc::new(ReqwestApi::new(&settings)?);
        Ok(Self::with_api(api, settings.poll_interval))
    }

    pub fn with_api(api: Arc<dyn StatusApi>, poll_interval: Duration) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
            let mut poller = Poller::new(Arc::clone(&api), poll_interval);

            while let Ok(command) = cmd_rx.recv() {
                handle_command(&runtime, &api, &mut poller, &sink, command);
            }
            poller.stop();
        });

        Self { cmd_tx, event_rx }
    }

    pub fn submit(&self, resume: ResumeFile, urls: impl Into<String>) {
        self.send(EngineCommand::Submit {
            resume,
            urls: urls.into(),
        });
    }

    pub fn start_polling(&self, job_id: JobId) {
        self.send(EngineCommand::StartPolling { job_id });
    }

    pub fn stop_polling(&self, job_id: JobId) {
        self.send(EngineCommand::StopPolling { job_id });
    }

    pub fn check_health(&self) {
        self.send(EngineCommand::CheckHealth);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_warn!("Engine thread is gone; command dropped");
        }
    }
}

fn handle_command(
    runtime: &tokio::runtime::Runtime,
    api: &Arc<dyn StatusApi>,
    poller: &mut Poller,
    sink: &Arc<dyn EventSink>,
    command: EngineCommand,
) {
    match command {
        EngineCommand::Submit { resume, urls } => {
            let api = Arc::clone(api);
            let sink = Arc::clone(sink);
            runtime.spawn(async move {
                let result = api.submit(&resume, &urls).await;
                match &result {
                    Ok(accepted) => engine_info!("Job {} accepted", accepted.job_id),
                    Err(err) => engine_warn!("Submission failed: {}", err),
                }
                sink.emit(EngineEvent::Submitted { result });
            });
        }
        EngineCommand::StartPolling { job_id } => {
            poller.start(runtime.handle(), job_id, Arc::clone(sink));
        }
        EngineCommand::StopPolling { job_id } => {
            if poller.active_job() == Some(&job_id) {
                poller.stop();
            }
        }
        EngineCommand::CheckHealth => {
            let api = Arc::clone(api);
            let sink = Arc::clone(sink);
            runtime.spawn(async move {
                let result = api.health().await;
                sink.emit(EngineEvent::HealthChecked { result });
            });
        }
    }
}
