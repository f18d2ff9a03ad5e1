//! Lifecycle events broadcast by the service registry.
//!
//! `ServiceEvent` is Clone + Send + Sync for use with tokio broadcast channels.
//! Subscribers (CLI session, logging) use them to refresh their views.

use serde::{Deserialize, Serialize};

use crate::service::{CancellationDecision, ServiceId, ServiceStatus};

/// Events emitted whenever the registry mutates a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServiceEvent {
    /// A batch of records was created. `ids` is in registry order.
    Created { ids: Vec<ServiceId> },

    /// A record was replaced wholesale.
    Updated { id: ServiceId },

    /// A coordinator assigned a driver and plate.
    Assigned {
        id: ServiceId,
        driver: String,
        plate: String,
    },

    /// A pending record was published for assignment.
    Opened { id: ServiceId },

    /// The trip was carried out.
    Completed { id: ServiceId },

    /// The user asked to cancel.
    CancellationRequested {
        id: ServiceId,
        previous: ServiceStatus,
    },

    /// A coordinator decided on a cancellation request.
    CancellationResolved {
        id: ServiceId,
        decision: CancellationDecision,
    },

    /// The newly-added designation was cleared (expiry or explicit clear).
    NewlyAddedCleared { id: ServiceId },
}

impl ServiceEvent {
    /// The single record this event concerns, or None for batch events.
    pub fn service_id(&self) -> Option<ServiceId> {
        match self {
            ServiceEvent::Updated { id }
            | ServiceEvent::Assigned { id, .. }
            | ServiceEvent::Opened { id }
            | ServiceEvent::Completed { id }
            | ServiceEvent::CancellationRequested { id, .. }
            | ServiceEvent::CancellationResolved { id, .. }
            | ServiceEvent::NewlyAddedCleared { id } => Some(*id),

            ServiceEvent::Created { .. } => None,
        }
    }
}
