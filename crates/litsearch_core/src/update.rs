use litsearch_logging::{lit_debug, lit_info, lit_trace, lit_warn};

use crate::{Answer, AppState, Effect, JobSnapshot, JobStatus, Msg, RequestId, Submission, ViewState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    if state.is_closed() {
        lit_trace!("Ignoring {:?} after shutdown", msg);
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::SubjectSubmitted(raw) => submit(&mut state, &raw),
        Msg::SubmitCompleted(result) => submit_completed(&mut state, result),
        Msg::PollTick => poll_tick(&mut state),
        Msg::StatusReceived(result) => status_received(&mut state, result),
        Msg::OpenConversation => open_conversation(&mut state),
        Msg::QuestionSubmitted(raw) => ask(&mut state, &raw),
        Msg::AnswerReceived { request_id, result } => {
            answer_received(&mut state, request_id, result)
        }
        Msg::Shutdown => shutdown(&mut state),
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit(state: &mut AppState, raw: &str) -> Vec<Effect> {
    let subject = raw.trim();
    if subject.is_empty() {
        return Vec::new();
    }
    let Some(build) = state.build_mut() else {
        return Vec::new();
    };
    if build.is_submitting() || build.view_state() == ViewState::Building {
        lit_debug!("Submission ignored: a build request is already active");
        return Vec::new();
    }

    lit_info!("Submitting corpus build subject_len={}", subject.len());
    build.begin_submit(subject.to_string());
    state.mark_dirty();
    vec![Effect::SubmitSubject {
        subject: subject.to_string(),
    }]
}

fn submit_completed(state: &mut AppState, result: Result<Submission, String>) -> Vec<Effect> {
    let interval = state.poll_interval();
    let Some(build) = state.build_mut() else {
        return Vec::new();
    };
    if !build.is_submitting() {
        lit_debug!("Submission result arrived with no submission in flight");
        return Vec::new();
    }

    let effects = match result {
        Ok(submission) => {
            lit_info!(
                "Corpus build accepted job_id={} keywords={:?}",
                submission.job_id,
                submission.keywords
            );
            build.accept_submission(submission);
            vec![Effect::StartPolling { interval }, Effect::FetchStatus]
        }
        Err(detail) => {
            lit_warn!("Corpus build rejected: {}", detail);
            build.reject_submission();
            Vec::new()
        }
    };
    state.mark_dirty();
    effects
}

fn poll_tick(state: &mut AppState) -> Vec<Effect> {
    let Some(build) = state.build_mut() else {
        return Vec::new();
    };
    if build.view_state() != ViewState::Building {
        return Vec::new();
    }
    if !build.begin_poll() {
        lit_debug!("Poll tick skipped: previous status request still in flight");
        return Vec::new();
    }
    vec![Effect::FetchStatus]
}

fn status_received(state: &mut AppState, result: Result<JobSnapshot, String>) -> Vec<Effect> {
    let Some(build) = state.build_mut() else {
        return Vec::new();
    };
    build.finish_poll();
    if build.view_state() != ViewState::Building {
        lit_debug!("Status result ignored outside the building view");
        return Vec::new();
    }

    let snapshot = match result {
        Ok(snapshot) => snapshot,
        Err(detail) => {
            lit_warn!("Status poll failed, retrying on next tick: {}", detail);
            return Vec::new();
        }
    };

    lit_debug!(
        "Job status={} progress={:?}",
        snapshot.status.label(),
        snapshot.progress
    );
    let error_message = snapshot.error_message();
    let status = snapshot.status;
    build.apply_snapshot(snapshot);

    let effects = match status {
        JobStatus::Ready => {
            lit_info!("Corpus ready, opening conversation");
            state.enter_conversation();
            vec![Effect::StopPolling, Effect::NavigateToConversation]
        }
        JobStatus::Error => {
            let message = error_message.unwrap_or_default();
            lit_warn!("Corpus build failed: {}", message);
            build.fail_job(message);
            vec![Effect::StopPolling]
        }
        _ => Vec::new(),
    };
    state.mark_dirty();
    effects
}

fn open_conversation(state: &mut AppState) -> Vec<Effect> {
    let Some(build) = state.build() else {
        return Vec::new();
    };
    if build.is_submitting() || build.view_state() == ViewState::Building {
        lit_debug!("Conversation not opened: a corpus build is active");
        return Vec::new();
    }
    state.enter_conversation();
    vec![Effect::NavigateToConversation]
}

fn ask(state: &mut AppState, raw: &str) -> Vec<Effect> {
    let question = raw.trim();
    if question.is_empty() {
        return Vec::new();
    }
    let Some(conversation) = state.conversation_mut() else {
        return Vec::new();
    };
    if let Some(pending) = conversation.pending() {
        lit_debug!("Question ignored: request {} still pending", pending);
        return Vec::new();
    }

    let request_id = conversation.begin_ask(question.to_string());
    lit_info!(
        "Asking request_id={} question_len={}",
        request_id,
        question.len()
    );
    state.mark_dirty();
    vec![Effect::SendQuestion {
        request_id,
        question: question.to_string(),
    }]
}

fn answer_received(
    state: &mut AppState,
    request_id: RequestId,
    result: Result<Answer, String>,
) -> Vec<Effect> {
    let Some(conversation) = state.conversation_mut() else {
        return Vec::new();
    };
    if conversation.pending() != Some(request_id) {
        lit_debug!("Dropping stale answer for request_id={}", request_id);
        return Vec::new();
    }

    match &result {
        Ok(answer) => lit_info!(
            "Answer received request_id={} sources={}",
            request_id,
            answer.sources.len()
        ),
        Err(detail) => lit_warn!("Question request_id={} failed: {}", request_id, detail),
    }
    conversation.settle(result);
    state.mark_dirty();
    Vec::new()
}

fn shutdown(state: &mut AppState) -> Vec<Effect> {
    let building = state
        .build()
        .is_some_and(|build| build.view_state() == ViewState::Building);
    state.close();
    if building {
        lit_info!("Shutting down during a build, releasing poll timer");
        vec![Effect::StopPolling]
    } else {
        Vec::new()
    }
}
