use crate::{Answer, JobSnapshot, RequestId, Submission};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User submitted a research subject from the build form.
    SubjectSubmitted(String),
    /// Engine finished the corpus-build request. `Err` carries the failure detail.
    SubmitCompleted(Result<Submission, String>),
    /// Poll timer fired.
    PollTick,
    /// Engine finished one status request. `Err` carries the failure detail.
    StatusReceived(Result<JobSnapshot, String>),
    /// User asked to chat over the existing corpus without building.
    OpenConversation,
    /// User submitted a question on the conversation screen.
    QuestionSubmitted(String),
    /// Engine settled a question. Delivered exactly once per `SendQuestion`.
    AnswerReceived {
        request_id: RequestId,
        result: Result<Answer, String>,
    },
    /// The owning view is being torn down.
    Shutdown,
    /// Fallback for placeholder wiring.
    NoOp,
}
