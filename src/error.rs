//! Error taxonomy for resolution, validation, authoring, and persistence.
//!
//! Validation problems travel as values (`ValidationFailure` carries the full
//! list); configuration defects and store failures surface as `Err` variants.

use crate::schema::{ClassToken, SchoolId};
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// A class was requested that has no registered default.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("unknown class token {token:?}")]
pub struct UnknownClassToken {
    pub token: String,
}

/// A candidate script is structurally malformed.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("walkthrough script failed validation: {}", .problems.join("; "))]
pub struct ValidationFailure {
    pub problems: Vec<String>,
}

/// Failure reported by an injected custom script store.
#[derive(Debug, ThisError)]
pub enum PersistenceError {
    #[error("custom script store I/O failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("custom script record could not be decoded{}: {source}", display_opt_path(.path))]
    Codec {
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },

    #[error("custom script store unavailable: {0}")]
    Backend(String),
}

fn display_opt_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|path| format!(" at {}", path.display()))
        .unwrap_or_default()
}

///
/// ResolveError
///

#[derive(Debug, ThisError)]
pub enum ResolveError {
    #[error(transparent)]
    UnknownClassToken(#[from] UnknownClassToken),

    #[error("custom walkthrough for {school}/{class} is invalid: {}", .problems.join("; "))]
    InvalidCustomScript {
        school: SchoolId,
        class: ClassToken,
        problems: Vec<String>,
    },

    #[error(
        "overlay pipeline produced an invalid walkthrough for {school}/{class}: {}",
        .problems.join("; ")
    )]
    ResolutionInvariantViolation {
        school: SchoolId,
        class: ClassToken,
        problems: Vec<String>,
    },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

///
/// AuthoringError
///

#[derive(Debug, ThisError)]
pub enum AuthoringError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
