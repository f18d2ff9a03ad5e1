use thiserror::Error;

use crate::service::{ServiceId, ServiceStatus};

/// Errors related to service lifecycle operations.
///
/// An unknown service id is not an error: registry operations report it as
/// `Ok(None)`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: ServiceId,
        from: ServiceStatus,
        to: ServiceStatus,
    },

    #[error("invalid assignment: {0}")]
    InvalidAssignment(String),

    #[error("a {status} service needs {field} to be set")]
    MissingField {
        status: ServiceStatus,
        field: &'static str,
    },

    #[error("display number sequence exhausted")]
    NumbersExhausted,

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from repository operations (used by trait definitions in medride-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        ServiceError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_display() {
        let id = ServiceId::new();
        let err = ServiceError::InvalidTransition {
            id,
            from: ServiceStatus::Cancelled,
            to: ServiceStatus::CancellationRequested,
        };
        assert_eq!(
            err.to_string(),
            format!("service {id} cannot move from CANCELLED to CANCELLATION_REQUESTED")
        );
    }

    #[test]
    fn test_missing_field_display() {
        let err = ServiceError::MissingField {
            status: ServiceStatus::Scheduled,
            field: "driver",
        };
        assert_eq!(err.to_string(), "a SCHEDULED service needs driver to be set");
    }

    #[test]
    fn test_repository_error_maps_to_storage() {
        let err: ServiceError = RepositoryError::Conflict("duplicate id".to_string()).into();
        assert_eq!(err.to_string(), "storage error: conflict: duplicate id");
    }
}
