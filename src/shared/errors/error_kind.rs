use serde::Serialize;
use std::fmt;

/// Closed vocabulary every storage failure is translated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    DuplicateEntry,
    ForeignKeyViolation,
    NotNullViolation,
    ValueTooLong,
    SyntaxError,
    SerializationFailure,
    UnsupportedFeature,
    Deadlock,
    PrivilegeViolation,
    TypeMismatch,
    ConnectionFailure,
    ReadOnly,
    NotFound,
    TooManyRows,
    TransactionFailure,
    StatementPreparationFailure,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DuplicateEntry => "duplicate_entry",
            ErrorKind::ForeignKeyViolation => "foreign_key_violation",
            ErrorKind::NotNullViolation => "not_null_violation",
            ErrorKind::ValueTooLong => "value_too_long",
            ErrorKind::SyntaxError => "syntax_error",
            ErrorKind::SerializationFailure => "serialization_failure",
            ErrorKind::UnsupportedFeature => "unsupported_feature",
            ErrorKind::Deadlock => "deadlock",
            ErrorKind::PrivilegeViolation => "privilege_violation",
            ErrorKind::TypeMismatch => "type_mismatch",
            ErrorKind::ConnectionFailure => "connection_failure",
            ErrorKind::ReadOnly => "read_only",
            ErrorKind::NotFound => "not_found",
            ErrorKind::TooManyRows => "too_many_rows",
            ErrorKind::TransactionFailure => "transaction_failure",
            ErrorKind::StatementPreparationFailure => "statement_preparation_failure",
            ErrorKind::Unknown => "unknown",
        }
    }

    /// Kinds caused by the shape of the submitted data rather than by the server.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ErrorKind::NotNullViolation | ErrorKind::ValueTooLong | ErrorKind::TypeMismatch
        )
    }

    /// Failures a caller-side retry policy may reasonably retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ErrorKind::SerializationFailure
                | ErrorKind::Deadlock
                | ErrorKind::ConnectionFailure
                | ErrorKind::TransactionFailure
        )
    }

    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            kind if kind.is_validation() => 422,
            _ => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_kinds_map_to_unprocessable_entity() {
        for kind in [
            ErrorKind::NotNullViolation,
            ErrorKind::ValueTooLong,
            ErrorKind::TypeMismatch,
        ] {
            assert_eq!(kind.http_status(), 422);
        }
    }

    #[test]
    fn server_side_kinds_map_to_internal_error() {
        for kind in [
            ErrorKind::DuplicateEntry,
            ErrorKind::Deadlock,
            ErrorKind::SyntaxError,
            ErrorKind::Unknown,
        ] {
            assert_eq!(kind.http_status(), 500);
        }
        assert_eq!(ErrorKind::NotFound.http_status(), 404);
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&ErrorKind::StatementPreparationFailure).unwrap();
        assert_eq!(json, "\"statement_preparation_failure\"");
    }
}
