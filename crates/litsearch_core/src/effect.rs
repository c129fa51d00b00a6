use std::time::Duration;

/// Correlates a question with the answer that settles it.
pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST the subject to the corpus-build endpoint.
    SubmitSubject { subject: String },
    /// Acquire the poll timer. Replaces any timer already running.
    StartPolling { interval: Duration },
    /// Issue one status request.
    FetchStatus,
    /// Release the poll timer.
    StopPolling,
    /// Leave the build screen for the conversation screen.
    NavigateToConversation,
    /// POST a question to the answering endpoint.
    SendQuestion {
        request_id: RequestId,
        question: String,
    },
}
