use litsearch_core::{
    Answer, Effect, JobProgress, JobSnapshot, JobStatus, Msg, Source, Submission,
};
use litsearch_engine::{
    ChatResponse, EngineEvent, EngineHandle, EnrichResponse, StatusResponse, WireJobStatus,
    WireProgress, WireSource,
};
use litsearch_logging::{lit_debug, lit_info, lit_warn};

/// Executes core effects against the engine. Navigation is handled by the
/// state machine itself, so the runner only logs it.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitSubject { subject } => {
                    lit_info!("SubmitSubject subject_len={}", subject.len());
                    self.engine.submit(subject);
                }
                Effect::StartPolling { interval } => {
                    lit_debug!("StartPolling interval_ms={}", interval.as_millis());
                    self.engine.start_polling(interval);
                }
                Effect::FetchStatus => self.engine.poll(),
                Effect::StopPolling => {
                    lit_debug!("StopPolling");
                    self.engine.stop_polling();
                }
                Effect::NavigateToConversation => {
                    lit_info!("Corpus ready; switching to conversation");
                }
                Effect::SendQuestion {
                    request_id,
                    question,
                } => {
                    lit_info!(
                        "SendQuestion request_id={} question_len={}",
                        request_id,
                        question.len()
                    );
                    self.engine.ask(request_id, question);
                }
            }
        }
    }

    pub fn check_health(&self) {
        self.engine.check_health();
    }

    pub fn shutdown(&mut self) {
        self.engine.shutdown();
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Submitted(result) => Msg::SubmitCompleted(
            result
                .map(map_submission)
                .map_err(|err| {
                    lit_warn!("Corpus build request failed: {}", err);
                    err.to_string()
                }),
        ),
        EngineEvent::PollTick => Msg::PollTick,
        EngineEvent::Status(result) => {
            Msg::StatusReceived(result.map(map_status).map_err(|err| err.to_string()))
        }
        EngineEvent::Answered { request_id, result } => Msg::AnswerReceived {
            request_id,
            result: result.map(map_answer).map_err(|err| {
                lit_warn!("Question {} failed: {}", request_id, err);
                err.to_string()
            }),
        },
    }
}

fn map_submission(response: EnrichResponse) -> Submission {
    Submission {
        job_id: response.job_id,
        keywords: response.keywords,
    }
}

fn map_status(response: StatusResponse) -> JobSnapshot {
    let status = response.status.map(map_job_status).unwrap_or_default();
    JobSnapshot::new(status, response.progress.map(map_progress))
}

fn map_job_status(status: WireJobStatus) -> JobStatus {
    match status {
        WireJobStatus::Extracting => JobStatus::Extracting,
        WireJobStatus::Fetching => JobStatus::Fetching,
        WireJobStatus::Parsing => JobStatus::Parsing,
        WireJobStatus::Chunking => JobStatus::Chunking,
        WireJobStatus::Embedding => JobStatus::Embedding,
        WireJobStatus::Ready => JobStatus::Ready,
        WireJobStatus::Error => JobStatus::Error,
    }
}

fn map_progress(progress: WireProgress) -> JobProgress {
    JobProgress {
        step: progress.step,
        current: progress.current,
        total: progress.total,
        error: progress.error,
    }
}

fn map_answer(response: ChatResponse) -> Answer {
    Answer {
        answer: response.answer,
        sources: response.sources.into_iter().map(map_source).collect(),
    }
}

fn map_source(source: WireSource) -> Source {
    Source {
        arxiv_id: source.arxiv_id,
        title: source.title,
        section: source.section,
        excerpt: source.excerpt,
        url: source.url,
        score: source.score,
    }
}
