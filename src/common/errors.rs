use sea_orm::DbErr;
use std::fmt;
use uuid::Uuid;

/// Typed errors for the attribution core.
///
/// The API layer sitting above this crate is expected to translate these into
/// its own wire representation; `Storage` is the only variant whose details
/// must not reach clients verbatim (see [`CoreError::user_message`]).
#[derive(Debug)]
pub enum CoreError {
    /// Referenced entity does not exist or is not visible to the caller.
    /// Deliberately indistinguishable from "owned by someone else".
    NotFound { resource: String, id: String },
    /// The operation would violate an exclusivity rule, e.g. a second open
    /// assignment for a sensor that already has one.
    Conflict { resource: String, message: String },
    /// Invalid caller input (unknown unit, inverted interval, blank name).
    Validation { field: String, message: String },
    /// A pagination token that could not be decoded.
    MalformedCursor { token: String },
    /// Persistence-layer failure. Logged internally, reported generically.
    Storage(DbErr),
}

impl CoreError {
    pub fn not_found(resource: &str, id: Uuid) -> Self {
        CoreError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn conflict(resource: &str, message: impl Into<String>) -> Self {
        CoreError::Conflict {
            resource: resource.to_string(),
            message: message.into(),
        }
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        CoreError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn malformed_cursor(token: &str) -> Self {
        CoreError::MalformedCursor {
            token: token.to_string(),
        }
    }

    /// The message safe to show to an API client. Identical to `Display`
    /// except for `Storage`, which collapses to a generic server error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            CoreError::Storage(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::NotFound { resource, id } => {
                write!(f, "{resource} with id '{id}' not found")
            }
            CoreError::Conflict { resource, message } => {
                write!(f, "conflict on {resource}: {message}")
            }
            CoreError::Validation { field, message } => {
                write!(f, "validation failed for field '{field}': {message}")
            }
            CoreError::MalformedCursor { token } => {
                write!(f, "malformed pagination cursor '{token}'")
            }
            CoreError::Storage(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CoreError::Storage(err) => Some(err),
            _ => None,
        }
    }
}

/// The partial unique index on `sensor_assignments (sensor_id) WHERE
/// detached_at IS NULL` closes the check-then-insert race under concurrent
/// writers; when it fires, the driver reports a unique violation and the
/// caller must see the same `Conflict` as the in-transaction check produces.
impl From<DbErr> for CoreError {
    fn from(err: DbErr) -> Self {
        let message = err.to_string();
        if message.contains("uq_sensor_assignments_open") {
            return CoreError::conflict(
                "sensor assignment",
                "sensor already has an open assignment",
            );
        }
        if message.contains("duplicate key") || message.contains("UNIQUE constraint") {
            return CoreError::Conflict {
                resource: "record".to_string(),
                message,
            };
        }
        CoreError::Storage(err)
    }
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;

    #[test]
    fn open_assignment_unique_violation_maps_to_conflict() {
        let db_err = DbErr::Exec(RuntimeErr::Internal(
            "duplicate key value violates unique constraint \"uq_sensor_assignments_open\""
                .to_string(),
        ));
        let err = CoreError::from(db_err);
        match err {
            CoreError::Conflict { resource, message } => {
                assert_eq!(resource, "sensor assignment");
                assert!(message.contains("open assignment"));
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn sqlite_unique_violation_maps_to_conflict() {
        let db_err = DbErr::Exec(RuntimeErr::Internal(
            "UNIQUE constraint failed: sensor_assignments.sensor_id".to_string(),
        ));
        assert!(matches!(
            CoreError::from(db_err),
            CoreError::Conflict { .. }
        ));
    }

    #[test]
    fn other_db_errors_stay_storage() {
        let db_err = DbErr::Conn(RuntimeErr::Internal("connection refused".to_string()));
        assert!(matches!(CoreError::from(db_err), CoreError::Storage(_)));
    }

    #[test]
    fn storage_user_message_is_generic() {
        let err = CoreError::Storage(DbErr::Conn(RuntimeErr::Internal(
            "password authentication failed for user \"brewtrace\"".to_string(),
        )));
        assert_eq!(err.user_message(), "internal server error");
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn not_found_display_names_resource_and_id() {
        let id = Uuid::new_v4();
        let err = CoreError::not_found("sensor", id);
        assert_eq!(err.to_string(), format!("sensor with id '{id}' not found"));
        assert_eq!(err.user_message(), err.to_string());
    }
}
