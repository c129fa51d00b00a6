/// Assistant reply appended when a question could not be answered.
pub const ASK_FAILURE_MESSAGE: &str = "Sorry, an error occurred while processing your question.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One retrieved passage backing an answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub arxiv_id: String,
    pub title: String,
    pub section: String,
    pub excerpt: String,
    pub url: String,
    /// Relevance in `[0, 1]`.
    pub score: f64,
}

/// Successful answer from the retrieval engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<Source>,
}

/// Transcript entry. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    role: Role,
    content: String,
    sources: Option<Vec<Source>>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sources: None,
        }
    }

    /// An empty source list is stored as `None`.
    pub fn assistant(answer: Answer) -> Self {
        let sources = (!answer.sources.is_empty()).then_some(answer.sources);
        Self {
            role: Role::Assistant,
            content: answer.answer,
            sources,
        }
    }

    pub fn apology() -> Self {
        Self {
            role: Role::Assistant,
            content: ASK_FAILURE_MESSAGE.to_string(),
            sources: None,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sources(&self) -> Option<&[Source]> {
        self.sources.as_deref()
    }
}
