//! Status poll schedule for the active job.
//!
//! One schedule runs at a time. Every tick spawns its own fetch, so a slow
//! response never delays the next tick; completions can therefore arrive out
//! of issue order. Stopping cancels the schedule and every fetch it issued.

use std::sync::Arc;
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use kyro_core::JobId;
use tokio::runtime::Handle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, EventSink, StatusApi};

struct ActivePoll {
    job_id: JobId,
    cancel: CancellationToken,
}

pub struct Poller {
    api: Arc<dyn StatusApi>,
    interval: Duration,
    active: Option<ActivePoll>,
}

impl Poller {
    pub fn new(api: Arc<dyn StatusApi>, interval: Duration) -> Self {
        Self {
            api,
            interval,
            active: None,
        }
    }

    pub fn active_job(&self) -> Option<&JobId> {
        self.active.as_ref().map(|poll| &poll.job_id)
    }

    /// Starts polling `job_id`, tearing down any previous schedule first.
    pub fn start(&mut self, runtime: &Handle, job_id: JobId, sink: Arc<dyn EventSink>) {
        self.stop();

        let cancel = CancellationToken::new();
        engine_info!(
            "Polling job {} every {} ms",
            job_id,
            self.interval.as_millis()
        );
        runtime.spawn(run_schedule(
            Arc::clone(&self.api),
            job_id.clone(),
            self.interval,
            cancel.clone(),
            sink,
        ));
        self.active = Some(ActivePoll { job_id, cancel });
    }

    /// Cancels the schedule and any fetch still in flight.
    pub fn stop(&mut self) -> Option<JobId> {
        let poll = self.active.take()?;
        poll.cancel.cancel();
        engine_info!("Stopped polling job {}", poll.job_id);
        Some(poll.job_id)
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(poll) = self.active.take() {
            poll.cancel.cancel();
        }
    }
}

async fn run_schedule(
    api: Arc<dyn StatusApi>,
    job_id: JobId,
    interval: Duration,
    cancel: CancellationToken,
    sink: Arc<dyn EventSink>,
) {
    // The first tick completes immediately: no dead interval on activation.
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        tokio::spawn(fetch_once(
            Arc::clone(&api),
            job_id.clone(),
            cancel.clone(),
            Arc::clone(&sink),
        ));
    }
}

async fn fetch_once(
    api: Arc<dyn StatusApi>,
    job_id: JobId,
    cancel: CancellationToken,
    sink: Arc<dyn EventSink>,
) {
    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        result = api.fetch_status(&job_id) => result,
    };
    if cancel.is_cancelled() {
        return;
    }

    match result {
        Ok(snapshot) => sink.emit(EngineEvent::SnapshotReceived { job_id, snapshot }),
        Err(error) => {
            engine_warn!("Status poll for job {} failed: {}", job_id, error);
            sink.emit(EngineEvent::PollFailed { job_id, error });
        }
    }
}
