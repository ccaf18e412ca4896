use std::time::Duration;
use thiserror::Error;

/// Raw failure raised below the repository.
///
/// Query building, tag sync and relinking return this untouched; only the
/// repository hands it to `ErrorClassifier`, once.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error(transparent)]
    Query(#[from] diesel::result::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("Blocking database task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Refusing to link an anime to an empty tag set")]
    EmptyTagSet,

    #[error("Tag sync resolved {found} of {expected} names")]
    MissingTags { expected: usize, found: usize },

    #[error("Expected at most one row, got {0}")]
    TooManyRows(usize),

    #[error("Operation exceeded its {0:?} deadline")]
    Timeout(Duration),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;
