//! LitSearch core: pure corpus-build and conversation state machines plus
//! view-model helpers.
mod effect;
mod job;
mod msg;
mod state;
mod transcript;
mod update;
mod view_model;

pub use effect::{Effect, RequestId};
pub use job::{JobProgress, JobSnapshot, JobStatus, Submission, JOB_ERROR_FALLBACK};
pub use msg::Msg;
pub use state::{
    AppState, BuildState, ConversationState, Screen, ViewState, DEFAULT_POLL_INTERVAL,
    SUBMISSION_FAILED_MESSAGE,
};
pub use transcript::{Answer, Message, Role, Source, ASK_FAILURE_MESSAGE};
pub use update::update;
pub use view_model::{
    relevance_percent, AppViewModel, BuildViewModel, CitationView, ConversationViewModel,
    MessageView, ABSTRACT_SECTION,
};
