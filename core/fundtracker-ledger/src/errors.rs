//! Error types for the ledger store

use thiserror::Error;

/// Ledger errors
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Update or workflow addressed a project id that is not in the ledger
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// Milestone id not present in its project
    #[error("Milestone {milestone} not found in project {project}")]
    MilestoneNotFound { project: String, milestone: String },

    /// Milestone step does not apply to the milestone's current status
    #[error("Milestone {milestone} of project {project} is {status}, expected {expected}")]
    InvalidMilestoneStatus {
        project: String,
        milestone: String,
        status: &'static str,
        expected: &'static str,
    },

    /// Submitter is not the contractor assigned to the project
    #[error("{user} is not the contractor of project {project}")]
    NotProjectContractor { project: String, user: String },

    /// Identifier generator kept producing ids already in use
    #[error("Duplicate {kind} id after {attempts} attempts: {id}")]
    DuplicateId {
        kind: &'static str,
        id: String,
        attempts: usize,
    },

    /// Persisted value under a key could not be decoded
    #[error("Corrupt record under key '{key}': {source}")]
    CorruptRecord {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Operation needs a logged-in user
    #[error("No user is logged in")]
    NotLoggedIn,

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
