//! Kyro engine: backend client, status poller and effect execution.
mod api;
mod engine;
mod poller;
mod sink;
mod types;
mod wire;

pub use api::{ApiSettings, ReqwestApi, StatusApi, DEFAULT_API_URL};
pub use engine::EngineHandle;
pub use poller::Poller;
pub use sink::{ChannelEventSink, EventSink};
pub use types::{ApiError, EngineEvent, FailureKind, SubmitAccepted};
