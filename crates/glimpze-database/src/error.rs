//! Mapping of sqlx failures into application errors.

use glimpze_core::error::{AppError, ErrorKind};

/// Name of the violated constraint, when the failure is a constraint violation.
pub(crate) fn constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}

/// Wrap a sqlx error as a database failure.
pub(crate) fn database(context: &'static str, err: sqlx::Error) -> AppError {
    AppError::with_source(ErrorKind::Database, context, err)
}
