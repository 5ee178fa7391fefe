//! Error taxonomy for the registry core.
//!
//! Every failure surfaces as a [`RegistryError`]. Callers that only care
//! about the broad category (bad input, missing client, conflicting
//! creation, or diverged internal state) can match on [`RegistryError::kind`].

use thiserror::Error;

pub type Result<T, E = RegistryError> = std::result::Result<T, E>;

/// Broad category of a [`RegistryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    HistoryCorruption,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Name was empty or only whitespace.
    #[error("invalid client name: {0:?}")]
    InvalidName(String),

    /// Score arrived as a negative number.
    #[error("invalid score {score} for client '{name}': scores must be >= 0")]
    InvalidScore { name: String, score: i64 },

    #[error("client '{0}' cannot follow itself")]
    SelfFollow(String),

    #[error("client '{requester}' already follows '{target}'")]
    AlreadyFollowing { requester: String, target: String },

    #[error("client '{0}' already follows {max} clients", max = crate::client::MAX_FOLLOWING)]
    FollowCapacityExceeded(String),

    /// A bulk-load record listed more follows than a client may hold.
    #[error("client '{name}' lists {count} follows (maximum is {max})", max = crate::client::MAX_FOLLOWING)]
    TooManyFollows { name: String, count: usize },

    #[error("client '{0}' cannot connect to itself")]
    SelfConnection(String),

    #[error("unknown client '{0}'")]
    UnknownClient(String),

    #[error("client '{0}' already exists")]
    DuplicateName(String),

    /// The action log and the structures it describes have diverged.
    #[error("history corruption: {0}")]
    HistoryCorruption(String),
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::InvalidName(_)
            | RegistryError::InvalidScore { .. }
            | RegistryError::SelfFollow(_)
            | RegistryError::AlreadyFollowing { .. }
            | RegistryError::FollowCapacityExceeded(_)
            | RegistryError::TooManyFollows { .. }
            | RegistryError::SelfConnection(_) => ErrorKind::Validation,
            RegistryError::UnknownClient(_) => ErrorKind::NotFound,
            RegistryError::DuplicateName(_) => ErrorKind::Conflict,
            RegistryError::HistoryCorruption(_) => ErrorKind::HistoryCorruption,
        }
    }
}

/// Rejects empty and whitespace-only names.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(RegistryError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Converts a signed score from an outer surface into the stored form.
pub fn validate_score(name: &str, score: i64) -> Result<u32> {
    u32::try_from(score).map_err(|_| RegistryError::InvalidScore {
        name: name.to_string(),
        score,
    })
}
