use std::time::Duration;

use crate::view_model::{AppViewModel, BuildViewModel, ConversationViewModel};
use crate::{Answer, JobSnapshot, Message, RequestId, Submission};

/// Fixed cadence between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Error text shown on the form when the backend rejects a build request.
pub const SUBMISSION_FAILED_MESSAGE: &str = "Could not start the corpus build. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Form,
    Building,
}

/// Job orchestrator state. Owns the view state and the latest job snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildState {
    view: ViewState,
    subject: String,
    submitting: bool,
    submission: Option<Submission>,
    job: Option<JobSnapshot>,
    error: Option<String>,
    poll_in_flight: bool,
}

impl BuildState {
    pub fn view_state(&self) -> ViewState {
        self.view
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }

    pub fn job(&self) -> Option<&JobSnapshot> {
        self.job.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_poll_in_flight(&self) -> bool {
        self.poll_in_flight
    }

    pub(crate) fn begin_submit(&mut self, subject: String) {
        self.subject = subject;
        self.submitting = true;
        self.error = None;
    }

    pub(crate) fn accept_submission(&mut self, submission: Submission) {
        self.submitting = false;
        self.submission = Some(submission);
        self.job = None;
        self.view = ViewState::Building;
        // The immediate poll goes out together with the timer.
        self.poll_in_flight = true;
    }

    pub(crate) fn reject_submission(&mut self) {
        self.submitting = false;
        self.error = Some(SUBMISSION_FAILED_MESSAGE.to_string());
    }

    /// Returns `false` when a poll is already in flight and the tick must be skipped.
    pub(crate) fn begin_poll(&mut self) -> bool {
        if self.poll_in_flight {
            return false;
        }
        self.poll_in_flight = true;
        true
    }

    pub(crate) fn finish_poll(&mut self) {
        self.poll_in_flight = false;
    }

    pub(crate) fn apply_snapshot(&mut self, snapshot: JobSnapshot) {
        self.job = Some(snapshot);
    }

    pub(crate) fn fail_job(&mut self, message: String) {
        self.view = ViewState::Form;
        self.poll_in_flight = false;
        self.error = Some(message);
    }

    fn view(&self) -> BuildViewModel {
        BuildViewModel::from_state(self)
    }
}

/// Conversation manager state. Owns the transcript.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConversationState {
    transcript: Vec<Message>,
    pending: Option<RequestId>,
    next_request_id: RequestId,
}

impl ConversationState {
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn pending(&self) -> Option<RequestId> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Appends the user message and marks the request pending in one step.
    pub(crate) fn begin_ask(&mut self, question: String) -> RequestId {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.transcript.push(Message::user(question));
        self.pending = Some(request_id);
        request_id
    }

    /// Appends exactly one assistant message and clears the pending request.
    pub(crate) fn settle(&mut self, result: Result<Answer, String>) {
        let reply = match result {
            Ok(answer) => Message::assistant(answer),
            Err(_) => Message::apology(),
        };
        self.transcript.push(reply);
        self.pending = None;
    }

    fn view(&self) -> ConversationViewModel {
        ConversationViewModel::from_state(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Build(BuildState),
    Conversation(ConversationState),
}

impl Default for Screen {
    fn default() -> Self {
        Screen::Build(BuildState::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    screen: Screen,
    poll_interval: Duration,
    closed: bool,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            screen: Screen::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            closed: false,
            dirty: false,
        }
    }
}

impl AppState {
    /// Starts on the build form.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn build(&self) -> Option<&BuildState> {
        match &self.screen {
            Screen::Build(build) => Some(build),
            Screen::Conversation(_) => None,
        }
    }

    pub fn conversation(&self) -> Option<&ConversationState> {
        match &self.screen {
            Screen::Conversation(conversation) => Some(conversation),
            Screen::Build(_) => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn view(&self) -> AppViewModel {
        match &self.screen {
            Screen::Build(build) => AppViewModel::Build(build.view()),
            Screen::Conversation(conversation) => AppViewModel::Conversation(conversation.view()),
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
        self.dirty = true;
    }

    pub(crate) fn build_mut(&mut self) -> Option<&mut BuildState> {
        match &mut self.screen {
            Screen::Build(build) => Some(build),
            Screen::Conversation(_) => None,
        }
    }

    pub(crate) fn conversation_mut(&mut self) -> Option<&mut ConversationState> {
        match &mut self.screen {
            Screen::Conversation(conversation) => Some(conversation),
            Screen::Build(_) => None,
        }
    }

    /// Drops the build screen. The orchestrator state does not survive navigation.
    pub(crate) fn enter_conversation(&mut self) {
        self.screen = Screen::Conversation(ConversationState::default());
        self.dirty = true;
    }
}
