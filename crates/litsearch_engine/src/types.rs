use std::fmt;

use serde::{Deserialize, Serialize};

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichRequest {
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnrichResponse {
    pub job_id: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireJobStatus {
    Extracting,
    Fetching,
    Parsing,
    Chunking,
    Embedding,
    Ready,
    Error,
}

/// Progress object as stored by the backend. A job that failed early only
/// carries `error`, so every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct WireProgress {
    #[serde(default)]
    pub step: String,
    #[serde(default)]
    pub current: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub error: Option<String>,
}

/// `status` and `progress` are both `null` before the first job exists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<WireJobStatus>,
    #[serde(default)]
    pub progress: Option<WireProgress>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireSource {
    pub arxiv_id: String,
    pub title: String,
    pub section: String,
    pub excerpt: String,
    pub url: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<WireSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Submitted(Result<EnrichResponse, ApiError>),
    PollTick,
    Status(Result<StatusResponse, ApiError>),
    /// Sent exactly once per `EngineHandle::ask`.
    Answered {
        request_id: RequestId,
        result: Result<ChatResponse, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ApiFailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ApiFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    Cancelled,
}

impl fmt::Display for ApiFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailureKind::InvalidUrl => write!(f, "invalid url"),
            ApiFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            ApiFailureKind::Timeout => write!(f, "timeout"),
            ApiFailureKind::Network => write!(f, "network error"),
            ApiFailureKind::Decode => write!(f, "decode error"),
            ApiFailureKind::Cancelled => write!(f, "cancelled"),
        }
    }
}
