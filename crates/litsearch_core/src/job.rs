/// Error text shown when the backend reports a failed job without a reason.
pub const JOB_ERROR_FALLBACK: &str = "The corpus build failed.";

/// Backend pipeline stage of the latest corpus build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobStatus {
    /// Not polled yet, or the backend has no job on record.
    #[default]
    Unknown,
    Extracting,
    Fetching,
    Parsing,
    Chunking,
    Embedding,
    Ready,
    Error,
}

impl JobStatus {
    /// `Ready` and `Error` stop polling; every other status keeps it going.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Ready | JobStatus::Error)
    }

    pub fn label(self) -> &'static str {
        match self {
            JobStatus::Unknown => "waiting",
            JobStatus::Extracting => "extracting",
            JobStatus::Fetching => "fetching",
            JobStatus::Parsing => "parsing",
            JobStatus::Chunking => "chunking",
            JobStatus::Embedding => "embedding",
            JobStatus::Ready => "ready",
            JobStatus::Error => "error",
        }
    }
}

/// Progress record attached to a status snapshot.
///
/// A job that failed before recording any step only carries `error`; the
/// other fields then hold their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobProgress {
    pub step: String,
    pub current: u64,
    pub total: u64,
    pub error: Option<String>,
}

impl JobProgress {
    /// `"current/total"`, or `None` while the stage has no known total.
    pub fn fraction_text(&self) -> Option<String> {
        (self.total > 0).then(|| format!("{}/{}", self.current, self.total))
    }

    pub fn percent(&self) -> Option<u8> {
        if self.total == 0 {
            return None;
        }
        let pct = self.current.min(self.total).saturating_mul(100) / self.total;
        Some(pct as u8)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobSnapshot {
    pub status: JobStatus,
    pub progress: Option<JobProgress>,
}

impl JobSnapshot {
    pub fn new(status: JobStatus, progress: Option<JobProgress>) -> Self {
        Self { status, progress }
    }

    /// User-facing failure text for an `Error` snapshot; `None` otherwise.
    pub fn error_message(&self) -> Option<String> {
        if self.status != JobStatus::Error {
            return None;
        }
        let reported = self
            .progress
            .as_ref()
            .and_then(|progress| progress.error.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty());
        Some(reported.unwrap_or(JOB_ERROR_FALLBACK).to_string())
    }
}

/// Accepted corpus-build request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Submission {
    pub job_id: String,
    pub keywords: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ready_and_error_are_terminal() {
        let terminal: Vec<_> = [
            JobStatus::Unknown,
            JobStatus::Extracting,
            JobStatus::Fetching,
            JobStatus::Parsing,
            JobStatus::Chunking,
            JobStatus::Embedding,
            JobStatus::Ready,
            JobStatus::Error,
        ]
        .into_iter()
        .filter(|status| status.is_terminal())
        .collect();
        assert_eq!(terminal, vec![JobStatus::Ready, JobStatus::Error]);
    }

    #[test]
    fn error_message_prefers_reported_text() {
        let snapshot = JobSnapshot::new(
            JobStatus::Error,
            Some(JobProgress {
                error: Some("ArXiv rate limit".into()),
                ..JobProgress::default()
            }),
        );
        assert_eq!(snapshot.error_message().as_deref(), Some("ArXiv rate limit"));
    }

    #[test]
    fn error_message_falls_back_when_missing_or_blank() {
        let bare = JobSnapshot::new(JobStatus::Error, None);
        assert_eq!(bare.error_message().as_deref(), Some(JOB_ERROR_FALLBACK));

        let blank = JobSnapshot::new(
            JobStatus::Error,
            Some(JobProgress {
                error: Some("   ".into()),
                ..JobProgress::default()
            }),
        );
        assert_eq!(blank.error_message().as_deref(), Some(JOB_ERROR_FALLBACK));

        let running = JobSnapshot::new(JobStatus::Parsing, None);
        assert_eq!(running.error_message(), None);
    }

    #[test]
    fn progress_fraction_needs_a_total() {
        let progress = JobProgress {
            step: "embedding chunks".into(),
            current: 40,
            total: 100,
            error: None,
        };
        assert_eq!(progress.fraction_text().as_deref(), Some("40/100"));
        assert_eq!(progress.percent(), Some(40));

        let unknown = JobProgress::default();
        assert_eq!(unknown.fraction_text(), None);
        assert_eq!(unknown.percent(), None);
    }

    #[test]
    fn percent_clamps_overshoot() {
        let progress = JobProgress {
            current: 130,
            total: 100,
            ..JobProgress::default()
        };
        assert_eq!(progress.percent(), Some(100));
    }
}
