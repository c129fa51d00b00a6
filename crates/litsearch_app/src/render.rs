//! Line-oriented terminal rendering.
//!
//! A terminal cannot redraw earlier output, so `Renderer` remembers what it
//! already printed and emits only the lines a new view model adds.

use litsearch_core::{
    AppViewModel, BuildViewModel, CitationView, ConversationViewModel, MessageView, Role,
    ViewState,
};

pub const CONVERSATION_BANNER: &str =
    "Corpus ready. Ask a question about the papers (Ctrl-D to quit).";

#[derive(Debug, Default)]
pub struct Renderer {
    last_build: Option<BuildViewModel>,
    last_status_line: Option<String>,
    in_conversation: bool,
    printed_messages: usize,
    was_pending: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        match view {
            AppViewModel::Build(build) => self.render_build(build),
            AppViewModel::Conversation(conversation) => self.render_conversation(conversation),
        }
    }

    fn render_build(&mut self, view: &BuildViewModel) -> Vec<String> {
        let previous = self.last_build.take().unwrap_or_default();
        let mut lines = Vec::new();

        if view.submitting && !previous.submitting {
            lines.push("Submitting...".to_string());
        }
        if view.job_id.is_some() && view.job_id != previous.job_id {
            lines.extend(submission_lines(view));
            self.last_status_line = None;
        }
        if view.view == ViewState::Building {
            let status = status_line(view);
            if self.last_status_line.as_deref() != Some(status.as_str()) {
                lines.push(status.clone());
                self.last_status_line = Some(status);
            }
        }
        if let Some(error) = &view.error {
            if previous.error.as_ref() != Some(error) {
                lines.push(format!("Error: {error}"));
            }
        }

        self.last_build = Some(view.clone());
        lines
    }

    fn render_conversation(&mut self, view: &ConversationViewModel) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.in_conversation {
            self.in_conversation = true;
            self.last_build = None;
            lines.push(String::new());
            lines.push(CONVERSATION_BANNER.to_string());
        }

        for message in view.messages.iter().skip(self.printed_messages) {
            // The terminal already shows what the user typed.
            if message.role == Role::Assistant {
                lines.extend(message_lines(message));
            }
        }
        self.printed_messages = view.messages.len();

        if view.pending && !self.was_pending {
            lines.push("Thinking...".to_string());
        }
        self.was_pending = view.pending;
        lines
    }
}

/// Prompt to show when the current screen accepts input, `None` while it is busy.
pub fn prompt(view: &AppViewModel) -> Option<&'static str> {
    match view {
        AppViewModel::Build(build) => {
            (build.view == ViewState::Form && !build.submitting).then_some("Research subject> ")
        }
        AppViewModel::Conversation(conversation) => (!conversation.pending).then_some("You> "),
    }
}

fn submission_lines(view: &BuildViewModel) -> Vec<String> {
    let job_id = view.job_id.as_deref().unwrap_or_default();
    let mut lines = vec![format!(
        "Building corpus for \"{}\" (job {job_id})",
        view.subject
    )];
    if !view.keywords.is_empty() {
        lines.push(format!("Keywords: {}", view.keywords.join(", ")));
    }
    lines
}

fn status_line(view: &BuildViewModel) -> String {
    let mut line = format!("[{}]", view.status.label());
    if let Some(step) = &view.step {
        line.push(' ');
        line.push_str(step);
    }
    if let Some(progress) = &view.progress_text {
        line.push(' ');
        line.push_str(progress);
    }
    if let Some(percent) = view.progress_percent {
        line.push_str(&format!(" ({percent}%)"));
    }
    line
}

fn message_lines(message: &MessageView) -> Vec<String> {
    let mut lines = vec![format!("Assistant: {}", message.content)];
    for citation in &message.citations {
        lines.extend(citation_lines(citation));
    }
    lines
}

fn citation_lines(citation: &CitationView) -> Vec<String> {
    let badge = if citation.is_abstract { " [Abstract]" } else { "" };
    vec![
        format!(
            "  [{}] {} (arXiv:{}){} {}",
            citation.index, citation.title, citation.arxiv_id, badge, citation.relevance_label
        ),
        format!("      \"{}\"", citation.excerpt),
        format!("      open: {}", citation.url),
    ]
}
