use crate::state::{BuildState, ConversationState};
use crate::{JobStatus, Message, Role, Source, ViewState};

/// Section label the retrieval engine uses for title-and-abstract chunks.
pub const ABSTRACT_SECTION: &str = "Abstract";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppViewModel {
    Build(BuildViewModel),
    Conversation(ConversationViewModel),
}

impl AppViewModel {
    pub fn as_build(&self) -> Option<&BuildViewModel> {
        match self {
            AppViewModel::Build(view) => Some(view),
            AppViewModel::Conversation(_) => None,
        }
    }

    pub fn as_conversation(&self) -> Option<&ConversationViewModel> {
        match self {
            AppViewModel::Conversation(view) => Some(view),
            AppViewModel::Build(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildViewModel {
    pub view: ViewState,
    pub subject: String,
    pub submitting: bool,
    pub job_id: Option<String>,
    pub keywords: Vec<String>,
    pub status: JobStatus,
    pub step: Option<String>,
    /// `"current/total"` for the active stage.
    pub progress_text: Option<String>,
    pub progress_percent: Option<u8>,
    pub error: Option<String>,
}

impl BuildViewModel {
    pub(crate) fn from_state(state: &BuildState) -> Self {
        let submission = state.submission();
        let job = state.job();
        let progress = job.and_then(|job| job.progress.as_ref());
        Self {
            view: state.view_state(),
            subject: state.subject().to_string(),
            submitting: state.is_submitting(),
            job_id: submission.map(|s| s.job_id.clone()),
            keywords: submission.map(|s| s.keywords.clone()).unwrap_or_default(),
            status: job.map(|job| job.status).unwrap_or_default(),
            step: progress
                .map(|p| p.step.clone())
                .filter(|step| !step.is_empty()),
            progress_text: progress.and_then(|p| p.fraction_text()),
            progress_percent: progress.and_then(|p| p.percent()),
            error: state.error().map(ToOwned::to_owned),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversationViewModel {
    pub messages: Vec<MessageView>,
    pub pending: bool,
}

impl ConversationViewModel {
    pub(crate) fn from_state(state: &ConversationState) -> Self {
        Self {
            messages: state.transcript().iter().map(MessageView::from_message).collect(),
            pending: state.is_pending(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub role: Role,
    pub content: String,
    pub citations: Vec<CitationView>,
}

impl MessageView {
    fn from_message(message: &Message) -> Self {
        let citations = message
            .sources()
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(idx, source)| CitationView::from_source(idx + 1, source))
            .collect();
        Self {
            role: message.role(),
            content: message.content().to_string(),
            citations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationView {
    /// 1-based position within the answer.
    pub index: usize,
    pub arxiv_id: String,
    pub title: String,
    pub section: String,
    pub is_abstract: bool,
    /// Quoted verbatim.
    pub excerpt: String,
    /// Target of both the citation label and the "open" link.
    pub url: String,
    pub relevance_percent: u32,
    pub relevance_label: String,
}

impl CitationView {
    fn from_source(index: usize, source: &Source) -> Self {
        let pct = relevance_percent(source.score);
        Self {
            index,
            arxiv_id: source.arxiv_id.clone(),
            title: source.title.clone(),
            section: source.section.clone(),
            is_abstract: source.section == ABSTRACT_SECTION,
            excerpt: source.excerpt.clone(),
            url: source.url.clone(),
            relevance_percent: pct,
            relevance_label: format!("{pct}% pertinent"),
        }
    }
}

/// `round(score * 100)`, clamped to `0..=100`. Non-finite scores map to 0.
pub fn relevance_percent(score: f64) -> u32 {
    if !score.is_finite() {
        return 0;
    }
    (score * 100.0).round().clamp(0.0, 100.0) as u32
}
