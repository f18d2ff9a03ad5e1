//! Service lifecycle transition table.
//!
//! ```text
//! Pending ──┬── assign ──────────────→ Scheduled ── complete ─→ Completed (terminal)
//!           ├── open ──→ Open ─ assign ──↗
//!           └── request_cancellation ─→ CancellationRequested ─┬─ approve → Cancelled (terminal)
//! Open ────── request_cancellation ──↗                          └─ reject  → NoShow   (terminal)
//! ```
//!
//! The table is advisory under [`TransitionPolicy::Permissive`]: the registry
//! applies any requested move and only logs the ones missing here. Under
//! [`TransitionPolicy::Strict`] a missing edge is an error.

use medride_types::config::TransitionPolicy;
use medride_types::error::ServiceError;
use medride_types::service::{ServiceId, ServiceRecord, ServiceStatus};

/// Statuses reachable in one step from `from`.
pub fn allowed_targets(from: ServiceStatus) -> &'static [ServiceStatus] {
    use ServiceStatus::*;
    match from {
        Pending => &[Scheduled, Open, CancellationRequested],
        Open => &[Scheduled, CancellationRequested],
        Scheduled => &[Completed],
        CancellationRequested => &[Cancelled, NoShow],
        Completed | Cancelled | NoShow => &[],
    }
}

/// Whether `from -> to` is an edge of the lifecycle table.
pub fn can_transition(from: ServiceStatus, to: ServiceStatus) -> bool {
    allowed_targets(from).contains(&to)
}

/// Whether the user-facing view may offer "request cancellation" for a record.
///
/// Programmed (scheduled) trips and anything already resolved are excluded.
pub fn can_request_cancellation(record: &ServiceRecord) -> bool {
    can_transition(record.status, ServiceStatus::CancellationRequested)
}

/// Apply `policy` to a requested move.
///
/// Returns `Ok(true)` when the edge exists, `Ok(false)` when it does not but
/// the policy lets it through, and `InvalidTransition` when the strict
/// policy refuses it.
pub fn check_transition(
    policy: TransitionPolicy,
    id: ServiceId,
    from: ServiceStatus,
    to: ServiceStatus,
) -> Result<bool, ServiceError> {
    if can_transition(from, to) {
        return Ok(true);
    }

    match policy {
        TransitionPolicy::Permissive => {
            tracing::debug!(service_id = %id, %from, %to, "applying transition outside the lifecycle table");
            Ok(false)
        }
        TransitionPolicy::Strict => {
            tracing::warn!(service_id = %id, %from, %to, "rejected transition");
            Err(ServiceError::InvalidTransition { id, from, to })
        }
    }
}

/// Fields a record must carry once it sits in its current status.
///
/// `Scheduled` needs the crew, a cancellation request needs its stamp and a
/// resolved cancellation needs its resolution stamp.
pub fn check_status_fields(record: &ServiceRecord) -> Result<(), ServiceError> {
    let missing = |field| ServiceError::MissingField {
        status: record.status,
        field,
    };
    match record.status {
        ServiceStatus::Scheduled if record.driver.is_none() => Err(missing("driver")),
        ServiceStatus::Scheduled if record.plate.is_none() => Err(missing("plate")),
        ServiceStatus::CancellationRequested if record.cancellation_requested_at.is_none() => {
            Err(missing("cancellation_requested_at"))
        }
        ServiceStatus::Cancelled | ServiceStatus::NoShow
            if record.cancellation_resolved_at.is_none() =>
        {
            Err(missing("cancellation_resolved_at"))
        }
        _ => Ok(()),
    }
}
