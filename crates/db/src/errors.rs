//! Classification of database errors.

use sea_orm::{DbErr, RuntimeErr, SqlErr};
use tasknote_common::AppError;

/// Message returned for any constraint violation.
const INTEGRITY_MESSAGE: &str = "Integrity constraint violated";

/// `PostgreSQL` SQLSTATE for a failed CHECK constraint.
const CHECK_VIOLATION: &str = "23514";

/// Map a sea-orm error onto the application error taxonomy.
///
/// Unique, foreign-key and check violations are client errors; anything else
/// is reported as a database failure.
#[must_use]
pub fn map_db_err(err: DbErr) -> AppError {
    if is_constraint_violation(&err) {
        tracing::debug!(error = %err, "Constraint violation");
        return AppError::Integrity(INTEGRITY_MESSAGE.to_string());
    }
    match err {
        DbErr::RecordNotFound(what) => AppError::NotFound(what),
        other => AppError::Database(other.to_string()),
    }
}

fn is_constraint_violation(err: &DbErr) -> bool {
    if matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(_) | SqlErr::ForeignKeyConstraintViolation(_))
    ) {
        return true;
    }

    let runtime = match err {
        DbErr::Exec(runtime) | DbErr::Query(runtime) => runtime,
        _ => return false,
    };
    match runtime {
        RuntimeErr::SqlxError(sea_orm::sqlx::Error::Database(db_err)) => {
            db_err.code().as_deref() == Some(CHECK_VIOLATION)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_errors_are_database_errors() {
        let err = map_db_err(DbErr::Custom("connection reset".to_string()));
        assert!(matches!(err, AppError::Database(_)));
        assert!(err.is_server_error());
    }

    #[test]
    fn test_record_not_found_maps_to_not_found() {
        let err = map_db_err(DbErr::RecordNotFound("note".to_string()));
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
