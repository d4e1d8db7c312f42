//! Shared Diesel error mapping for every repository adapter.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::StoreError;

use super::pool::PoolError;

/// Map pool errors into a store connection error.
pub(crate) fn map_pool_error(error: PoolError) -> StoreError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    StoreError::connection(message)
}

/// Map Diesel errors into store errors.
///
/// Constraint names are kept in the message so services and logs can tell a
/// duplicate vote from a duplicate attendance slot.
pub(crate) fn map_diesel_error(error: DieselError) -> StoreError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => StoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => StoreError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StoreError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            StoreError::conflict(info.constraint_name().unwrap_or("unique constraint"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            StoreError::missing_reference(info.constraint_name().unwrap_or("foreign key"))
        }
        DieselError::DatabaseError(_, _) => StoreError::query("database error"),
        _ => StoreError::query("database error"),
    }
}

/// Convert a stored integer into an index, rejecting negatives.
pub(crate) fn to_index(value: i32, column: &str) -> Result<usize, StoreError> {
    usize::try_from(value).map_err(|_| StoreError::query(format!("negative {column}: {value}")))
}

/// Convert an index into a stored integer.
pub(crate) fn from_index(value: usize, column: &str) -> Result<i32, StoreError> {
    i32::try_from(value).map_err(|_| StoreError::query(format!("{column} out of range: {value}")))
}

/// Convert a `COUNT(*)` result, rejecting negatives.
pub(crate) fn to_count(value: i64) -> Result<u64, StoreError> {
    u64::try_from(value).map_err(|_| StoreError::query(format!("negative count {value}")))
}

/// Parse a stored vocabulary value, reporting corrupt rows as query errors.
pub(crate) fn parse_column<T>(value: &str) -> Result<T, StoreError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|err: T::Err| StoreError::query(err.to_string()))
}
