//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use semester_domain::SemesterError;

/// Error newtype that keeps conversions on the infrastructure side and can
/// be converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SemesterError);

impl From<InfraError> for SemesterError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SemesterError> for InfraError {
    fn from(value: SemesterError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and
/// within this module.
trait IntoSemesterError {
    fn into_semester(self) -> SemesterError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → SemesterError */
/* -------------------------------------------------------------------------- */

impl IntoSemesterError for SqlError {
    fn into_semester(self) -> SemesterError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        SemesterError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        SemesterError::Database("database is locked".into())
                    }
                    // 2067 = SQLITE_CONSTRAINT_UNIQUE, 1555 = _PRIMARYKEY
                    (ErrorCode::ConstraintViolation, 2067 | 1555) => {
                        SemesterError::Conflict("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        SemesterError::Database("foreign key constraint violation".into())
                    }
                    _ => SemesterError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => SemesterError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                SemesterError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                SemesterError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => {
                SemesterError::Database("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidQuery => SemesterError::Database("invalid SQL query".into()),
            other => SemesterError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_semester())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → SemesterError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(SemesterError::Database(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SemesterError */
/* -------------------------------------------------------------------------- */

impl IntoSemesterError for HttpError {
    fn into_semester(self) -> SemesterError {
        if self.is_timeout() {
            SemesterError::Calendar(format!("request timed out: {self}"))
        } else if self.is_connect() {
            SemesterError::Calendar(format!("connection failed: {self}"))
        } else if self.is_decode() {
            SemesterError::Calendar(format!("failed to decode response body: {self}"))
        } else {
            SemesterError::Calendar(format!("http request failed: {self}"))
        }
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_semester())
    }
}
