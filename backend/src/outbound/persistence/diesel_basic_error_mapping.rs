//! Diesel and pool error mapping shared by the repositories.
//!
//! Each repository passes its own port error constructors so the mapping
//! stays in one place while the error types stay port-specific.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure through the repository's connection constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map a Diesel failure to a query or connection error.
///
/// Details are logged at `debug` and replaced by a fixed message so SQL and
/// constraint names never reach a client.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

/// Name of the constraint a failed write violated, for the given kind.
pub(crate) fn violated_constraint(error: &DieselError, kind: ViolationKind) -> Option<String> {
    match (error, kind) {
        (DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info), ViolationKind::Unique)
        | (
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info),
            ViolationKind::ForeignKey,
        ) => Some(info.constraint_name().unwrap_or("unknown").to_owned()),
        _ => None,
    }
}

/// Constraint family inspected by [`violated_constraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ViolationKind {
    Unique,
    ForeignKey,
}
