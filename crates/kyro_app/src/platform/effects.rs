use engine_logging::{engine_debug, engine_info, engine_warn};
use kyro_core::{Effect, Msg};
use kyro_engine::{ApiError, ApiSettings, EngineEvent, EngineHandle, SubmitAccepted};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        Ok(Self {
            engine: EngineHandle::new(settings)?,
        })
    }

    pub fn check_health(&self) {
        self.engine.check_health();
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitApplication { resume, urls } => {
                    engine_info!(
                        "SubmitApplication resume={} url_lines={}",
                        resume.file_name,
                        urls.lines().count()
                    );
                    self.engine.submit(resume, urls);
                }
                Effect::StartPolling { job_id } => {
                    engine_info!("StartPolling job_id={}", job_id);
                    self.engine.start_polling(job_id);
                }
                Effect::StopPolling { job_id } => {
                    engine_info!("StopPolling job_id={}", job_id);
                    self.engine.stop_polling(job_id);
                }
            }
        }
    }

    /// Next engine event that the state machine cares about, if any is queued.
    pub fn next_msg(&self) -> Option<Msg> {
        while let Some(event) = self.engine.try_recv() {
            if let Some(msg) = map_event(event) {
                return Some(msg);
            }
        }
        None
    }
}

fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::Submitted {
            result: Ok(accepted),
        } => {
            let notice = submission_notice(&accepted);
            Some(Msg::SubmitSucceeded {
                job_id: accepted.job_id,
                notice,
            })
        }
        EngineEvent::Submitted { result: Err(err) } => Some(Msg::SubmitFailed {
            message: err.to_string(),
        }),
        EngineEvent::SnapshotReceived { job_id, snapshot } => {
            engine_debug!("Snapshot for job {}: {} tasks", job_id, snapshot.status.len());
            Some(Msg::SnapshotReceived { job_id, snapshot })
        }
        EngineEvent::PollFailed { job_id, error } => Some(Msg::PollFailed {
            job_id,
            message: error.to_string(),
        }),
        EngineEvent::HealthChecked { result: Ok(()) } => {
            engine_info!("Backend health check passed");
            None
        }
        EngineEvent::HealthChecked { result: Err(err) } => {
            engine_warn!("Backend health check failed: {}", err);
            None
        }
    }
}

fn submission_notice(accepted: &SubmitAccepted) -> Option<String> {
    match (&accepted.message, accepted.urls.len()) {
        (Some(message), _) => Some(message.clone()),
        (None, 0) => None,
        (None, count) => Some(format!("Started processing {count} applications")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kyro_core::{JobId, StatusSnapshot};
    use kyro_engine::FailureKind;

    #[test]
    fn accepted_submission_without_message_counts_urls() {
        let msg = map_event(EngineEvent::Submitted {
            result: Ok(SubmitAccepted {
                job_id: JobId::from("job-1"),
                message: None,
                urls: vec!["a.com".into(), "b.com".into()],
            }),
        });
        assert_eq!(
            msg,
            Some(Msg::SubmitSucceeded {
                job_id: JobId::from("job-1"),
                notice: Some("Started processing 2 applications".into()),
            })
        );
    }

    #[test]
    fn failed_submission_becomes_alert_message() {
        let msg = map_event(EngineEvent::Submitted {
            result: Err(ApiError {
                kind: FailureKind::HttpStatus(500),
                message: "Internal Server Error".into(),
            }),
        });
        assert_eq!(
            msg,
            Some(Msg::SubmitFailed {
                message: "http status 500: Internal Server Error".into()
            })
        );
    }

    #[test]
    fn snapshots_keep_their_job_id() {
        let msg = map_event(EngineEvent::SnapshotReceived {
            job_id: JobId::from("job-9"),
            snapshot: StatusSnapshot::default(),
        });
        assert!(matches!(
            msg,
            Some(Msg::SnapshotReceived { job_id, .. }) if job_id.as_str() == "job-9"
        ));
    }

    #[test]
    fn health_results_are_log_only() {
        assert_eq!(
            map_event(EngineEvent::HealthChecked { result: Ok(()) }),
            None
        );
    }
}
