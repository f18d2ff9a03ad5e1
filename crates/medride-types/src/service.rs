use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::authorization::AuthorizationId;

/// Unique identifier for a service record, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId(pub Uuid);

impl ServiceId {
    /// Create a new ServiceId using UUID v7.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ServiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ServiceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Lifecycle states of a transport service.
///
/// - Pending: requested by the user, awaiting the coordinator
/// - Open: published by the coordinator, not yet assigned
/// - Scheduled: driver and plate assigned ("programmed")
/// - CancellationRequested: the user asked to cancel, awaiting a decision
/// - Completed, Cancelled, NoShow: terminal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    #[default]
    Pending,
    Open,
    Scheduled,
    CancellationRequested,
    Completed,
    Cancelled,
    NoShow,
}

impl ServiceStatus {
    pub const ALL: [ServiceStatus; 7] = [
        ServiceStatus::Pending,
        ServiceStatus::Open,
        ServiceStatus::Scheduled,
        ServiceStatus::CancellationRequested,
        ServiceStatus::Completed,
        ServiceStatus::Cancelled,
        ServiceStatus::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Pending => "PENDING",
            ServiceStatus::Open => "OPEN",
            ServiceStatus::Scheduled => "SCHEDULED",
            ServiceStatus::CancellationRequested => "CANCELLATION_REQUESTED",
            ServiceStatus::Completed => "COMPLETED",
            ServiceStatus::Cancelled => "CANCELLED",
            ServiceStatus::NoShow => "NO_SHOW",
        }
    }

    /// Check if this is a terminal state (no further transitions in the lifecycle table).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ServiceStatus::Completed | ServiceStatus::Cancelled | ServiceStatus::NoShow
        )
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(ServiceStatus::Pending),
            "open" => Ok(ServiceStatus::Open),
            "scheduled" | "programmed" => Ok(ServiceStatus::Scheduled),
            "cancellation_requested" => Ok(ServiceStatus::CancellationRequested),
            "completed" => Ok(ServiceStatus::Completed),
            "cancelled" | "canceled" => Ok(ServiceStatus::Cancelled),
            "no_show" | "noshow" => Ok(ServiceStatus::NoShow),
            other => Err(format!("invalid service status: '{other}'")),
        }
    }
}

/// Coordinator decision on a pending cancellation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancellationDecision {
    /// The service is cancelled.
    Approve,
    /// The request is refused and the trip is recorded as a no-show.
    Reject,
}

impl CancellationDecision {
    /// Status the record lands in after this decision.
    pub fn target_status(&self) -> ServiceStatus {
        match self {
            CancellationDecision::Approve => ServiceStatus::Cancelled,
            CancellationDecision::Reject => ServiceStatus::NoShow,
        }
    }
}

impl fmt::Display for CancellationDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancellationDecision::Approve => write!(f, "approve"),
            CancellationDecision::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for CancellationDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approve" | "approved" => Ok(CancellationDecision::Approve),
            "reject" | "rejected" => Ok(CancellationDecision::Reject),
            other => Err(format!("invalid cancellation decision: '{other}'")),
        }
    }
}

/// Proof-of-service signature metadata attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignatureInfo {
    pub present: bool,
    pub valid: bool,
    /// Size of the captured signature image in bytes (0 when absent).
    pub size_bytes: u64,
}

impl SignatureInfo {
    /// Placeholder attached to freshly created records: nothing captured yet.
    pub fn placeholder() -> Self {
        Self::default()
    }

    /// Metadata for a captured, verified signature.
    pub fn captured(size_bytes: u64) -> Self {
        Self {
            present: true,
            valid: size_bytes > 0,
            size_bytes,
        }
    }
}

/// Driver and vehicle plate assigned by a coordinator. Always set together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub driver: String,
    pub plate: String,
}

/// One trip in a creation request.
///
/// `requested_for` is the raw date-time as typed into a form
/// (e.g. `2024-05-10T08:30`). It may be absent or malformed; neither fails
/// creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedTrip {
    pub origin: String,
    pub destination: String,
    pub origin_city: String,
    pub destination_city: String,
    pub origin_detail: String,
    pub destination_detail: String,
    pub notes: String,
    pub requested_for: Option<String>,
}

/// A single medical-transport trip tracked by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: ServiceId,
    /// Human-readable sequence code, e.g. `SRV-000042`.
    pub number: String,
    pub authorization_id: AuthorizationId,
    pub voucher_ref: String,
    pub voucher_date: NaiveDate,
    pub authorized_rate: String,
    /// Requested date in the configured locale format, empty when unknown.
    pub contracted_date: String,
    /// Requested date and time in the configured locale format, empty when unknown.
    pub scheduled_date_time: String,
    pub origin: String,
    pub destination: String,
    pub origin_city: String,
    pub destination_city: String,
    pub origin_detail: String,
    pub destination_detail: String,
    pub notes: String,
    pub status: ServiceStatus,
    pub driver: Option<String>,
    pub plate: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub cancellation_requested_at: Option<DateTime<Utc>>,
    pub cancellation_resolved_at: Option<DateTime<Utc>>,
    pub is_authorized: bool,
    pub signature: SignatureInfo,
}

impl ServiceRecord {
    /// Whether driver and plate are both set or both unset.
    pub fn has_consistent_assignment(&self) -> bool {
        self.driver.is_some() == self.plate.is_some()
    }

    /// The assigned driver/plate pair, if any.
    pub fn assignment(&self) -> Option<Assignment> {
        match (&self.driver, &self.plate) {
            (Some(driver), Some(plate)) => Some(Assignment {
                driver: driver.clone(),
                plate: plate.clone(),
            }),
            _ => None,
        }
    }
}
