//! LitSearch engine: HTTP backend client, poll timer and effect execution.
mod backend;
mod decode;
mod engine;
mod timer;
mod types;

pub use backend::{ApiSettings, Backend, HttpBackend};
pub use decode::{decode_json, error_detail};
pub use engine::EngineHandle;
pub use timer::PollTimer;
pub use types::{
    ApiError, ApiFailureKind, ChatRequest, ChatResponse, EngineEvent, EnrichRequest,
    EnrichResponse, HealthResponse, RequestId, StatusResponse, WireJobStatus, WireProgress,
    WireSource,
};
