//! Storage error classification
//!
//! The only place that knows how the driver reports failures. Porting to a
//! different engine means replacing `classify_database_error` and
//! `MESSAGE_SIGNATURES`; the rest of the crate only sees `ErrorKind`.
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use super::{AppError, ErrorKind};
use crate::log_error;
use crate::shared::infrastructure::PersistenceError;

/// Where a failure surfaced; logged next to the classified kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceSite {
    pub operation: &'static str,
    pub file: &'static str,
    pub line: u32,
}

impl TraceSite {
    pub const fn new(operation: &'static str, file: &'static str, line: u32) -> Self {
        Self {
            operation,
            file,
            line,
        }
    }

    pub fn trace_id(&self) -> String {
        format!("{}@{}:{}", self.operation, self.file, self.line)
    }
}

/// Capture the current source location for `ErrorClassifier::report`.
#[macro_export]
macro_rules! trace_site {
    ($operation:expr) => {
        $crate::shared::errors::TraceSite::new($operation, file!(), line!())
    };
}

/// Postgres reports these without a dedicated diesel `DatabaseErrorKind`;
/// matched against the lower-cased server message, first hit wins.
const MESSAGE_SIGNATURES: &[(&str, ErrorKind)] = &[
    // 23xxx integrity constraints, when diesel did not tag them
    ("duplicate key value violates unique constraint", ErrorKind::DuplicateEntry),
    ("violates foreign key constraint", ErrorKind::ForeignKeyViolation),
    ("violates not-null constraint", ErrorKind::NotNullViolation),
    // 22001
    ("value too long for type", ErrorKind::ValueTooLong),
    // 42601
    ("syntax error", ErrorKind::SyntaxError),
    // 40001
    ("could not serialize access", ErrorKind::SerializationFailure),
    // 40P01
    ("deadlock detected", ErrorKind::Deadlock),
    // 0A000
    ("not supported", ErrorKind::UnsupportedFeature),
    // 42501
    ("permission denied", ErrorKind::PrivilegeViolation),
    ("must be owner of", ErrorKind::PrivilegeViolation),
    // 42804, 42883, 22P02, 42P18
    ("invalid input syntax for type", ErrorKind::TypeMismatch),
    ("invalid input value for enum", ErrorKind::TypeMismatch),
    ("operator does not exist", ErrorKind::TypeMismatch),
    ("could not determine data type", ErrorKind::TypeMismatch),
    ("but expression is of type", ErrorKind::TypeMismatch),
    // 25006
    ("read-only transaction", ErrorKind::ReadOnly),
    // 21000
    ("more than one row returned", ErrorKind::TooManyRows),
    // 26000, 42P05
    ("prepared statement", ErrorKind::StatementPreparationFailure),
    // 57014, 25P02
    ("canceling statement due to statement timeout", ErrorKind::TransactionFailure),
    ("current transaction is aborted", ErrorKind::TransactionFailure),
    // 08xxx, 57P01
    ("terminating connection", ErrorKind::ConnectionFailure),
    ("server closed the connection", ErrorKind::ConnectionFailure),
    ("could not connect", ErrorKind::ConnectionFailure),
];

pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn classify(err: &PersistenceError) -> ErrorKind {
        match err {
            PersistenceError::Query(e) => Self::classify_diesel(e),
            PersistenceError::Pool(_) => ErrorKind::ConnectionFailure,
            PersistenceError::Join(_) => ErrorKind::TransactionFailure,
            PersistenceError::EmptyTagSet => ErrorKind::NotNullViolation,
            PersistenceError::TooManyRows(_) => ErrorKind::TooManyRows,
            PersistenceError::MissingTags { .. } => ErrorKind::TransactionFailure,
            PersistenceError::Timeout(_) => ErrorKind::TransactionFailure,
        }
    }

    /// Classify, log once at error level, and convert into the public error.
    pub fn report(err: PersistenceError, site: TraceSite) -> AppError {
        let kind = Self::classify(&err);

        log_error!(
            "[{}] {} failed with {}: {}",
            site.trace_id(),
            site.operation,
            kind,
            err
        );

        match kind {
            ErrorKind::NotFound => AppError::NotFound(err.to_string()),
            kind => AppError::Database {
                kind,
                message: err.to_string(),
            },
        }
    }

    fn classify_diesel(err: &DieselError) -> ErrorKind {
        match err {
            DieselError::NotFound => ErrorKind::NotFound,
            DieselError::DatabaseError(kind, info) => {
                Self::classify_database_error(kind, info.message())
            }
            DieselError::QueryBuilderError(_) | DieselError::InvalidCString(_) => {
                ErrorKind::StatementPreparationFailure
            }
            DieselError::SerializationError(_) | DieselError::DeserializationError(_) => {
                ErrorKind::TypeMismatch
            }
            DieselError::RollbackErrorOnCommit { commit_error, .. } => {
                Self::classify_diesel(commit_error)
            }
            DieselError::RollbackTransaction
            | DieselError::AlreadyInTransaction
            | DieselError::NotInTransaction
            | DieselError::BrokenTransactionManager => ErrorKind::TransactionFailure,
            _ => ErrorKind::Unknown,
        }
    }

    fn classify_database_error(kind: &DatabaseErrorKind, message: &str) -> ErrorKind {
        match kind {
            DatabaseErrorKind::UniqueViolation => ErrorKind::DuplicateEntry,
            DatabaseErrorKind::ForeignKeyViolation => ErrorKind::ForeignKeyViolation,
            DatabaseErrorKind::NotNullViolation => ErrorKind::NotNullViolation,
            // value outside the column's domain, e.g. a non-positive episode count
            DatabaseErrorKind::CheckViolation => ErrorKind::TypeMismatch,
            DatabaseErrorKind::SerializationFailure => ErrorKind::SerializationFailure,
            DatabaseErrorKind::ReadOnlyTransaction => ErrorKind::ReadOnly,
            DatabaseErrorKind::UnableToSendCommand | DatabaseErrorKind::ClosedConnection => {
                ErrorKind::ConnectionFailure
            }
            _ => Self::classify_message(message),
        }
    }

    fn classify_message(message: &str) -> ErrorKind {
        let message = message.to_lowercase();
        MESSAGE_SIGNATURES
            .iter()
            .find(|(signature, _)| message.contains(signature))
            .map(|(_, kind)| *kind)
            .unwrap_or(ErrorKind::Unknown)
    }
}
