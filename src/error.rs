//! Error taxonomy for reconciliation
//!
//! Every failure a reconciliation can hit is one of these variants. None of
//! them are retried or downgraded; the CLI turns them into `eyre` reports.

use std::fmt;

/// Failure talking to the remote integrations API
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("remote returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode remote response: {0}")]
    Decode(String),

    #[error("no auth token configured (set api.token or SENTRY_AUTH_TOKEN)")]
    MissingToken,
}

impl From<ureq::Error> for RemoteError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(status) => Self::Status {
                status,
                message: String::new(),
            },
            other => Self::Transport(other.to_string()),
        }
    }
}

/// Errors surfaced by the reconciliation core
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("unable to reach organization integrations: {0}")]
    Remote(#[from] RemoteError),

    #[error("no matching organization integration configuration found for provider {provider_key:?} with name {name:?}")]
    NotFound { provider_key: String, name: String },

    #[error("found {count} organization integration configurations for provider {provider_key:?} with name {name:?}")]
    NotUnique {
        provider_key: String,
        name: String,
        count: usize,
    },

    #[error("failed to convert configuration document: {0}")]
    Conversion(#[from] serde_json::Error),

    #[error("malformed composite id {id:?}: {reason}")]
    MalformedId { id: String, reason: String },

    #[error("held integration id {held:?} does not match id {matched:?} of the integration named {name:?}")]
    IdMismatch {
        held: String,
        matched: String,
        name: String,
    },

    #[error("remote repeated pagination cursor {cursor:?}")]
    PaginationLoop { cursor: String },
}

impl ReconcileError {
    pub fn malformed_id(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedId {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Where a reconciliation was when it stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Listing,
    Matched,
    Projecting,
    Updating,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Listing => "listing",
            Phase::Matched => "matched",
            Phase::Projecting => "projecting",
            Phase::Updating => "updating",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// A [`ReconcileError`] tagged with the phase it happened in
#[derive(Debug, thiserror::Error)]
#[error("{source} (while {phase})")]
pub struct PhaseError {
    pub phase: Phase,
    #[source]
    pub source: ReconcileError,
}

impl PhaseError {
    pub fn new(phase: Phase, source: ReconcileError) -> Self {
        Self { phase, source }
    }
}

pub type Result<T, E = ReconcileError> = std::result::Result<T, E>;
