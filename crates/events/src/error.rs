use thiserror::Error;

/// Why a `publish` call did not run every subscribed handler to completion.
///
/// Both variants are raised *after* the event was appended to the log; the
/// `sequence` field identifies that entry.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("handler #{position} `{handler}` for `{kind}` (seq {sequence}) failed: {source}")]
    Handler {
        kind: &'static str,
        sequence: u64,
        position: usize,
        handler: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("publish of `{kind}` (seq {sequence}) cancelled after {completed} of {total} handlers")]
    Cancelled {
        kind: &'static str,
        sequence: u64,
        completed: usize,
        total: usize,
    },
}

impl PublishError {
    pub fn kind(&self) -> &'static str {
        match self {
            PublishError::Handler { kind, .. } | PublishError::Cancelled { kind, .. } => *kind,
        }
    }

    /// Log position of the event.
    pub fn sequence(&self) -> u64 {
        match self {
            PublishError::Handler { sequence, .. } | PublishError::Cancelled { sequence, .. } => {
                *sequence
            }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, PublishError::Cancelled { .. })
    }
}
