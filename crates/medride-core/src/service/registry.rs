//! Service registry: the single owner of service records.
//!
//! Every collaborator (user view, coordinator view, CLI) goes through this
//! type to create records and move them through the lifecycle. Unknown ids
//! are reported as `Ok(None)` and never as an error. Under the default
//! [`TransitionPolicy::Permissive`] the cancellation operations apply their
//! transition whatever the current status is.

use std::time::Duration;

use chrono::Utc;
use medride_types::authorization::Authorization;
use medride_types::config::{RegistryConfig, TransitionPolicy};
use medride_types::error::ServiceError;
use medride_types::event::ServiceEvent;
use medride_types::service::{
    Assignment, CancellationDecision, RequestedTrip, ServiceId, ServiceRecord, ServiceStatus,
    SignatureInfo,
};
use tokio::sync::broadcast;

use crate::event::EventBus;
use crate::lifecycle::{check_status_fields, check_transition};
use crate::repository::service::{ServiceFilter, ServiceRepository};
use crate::service::highlight::NewlyAdded;
use crate::service::numbering::{NumberSequence, parse_number};
use crate::service::schedule::ScheduleFormatter;

/// Registry orchestrating the full service lifecycle.
///
/// Generic over the repository trait -- medride-core never depends on
/// medride-infra.
pub struct ServiceRegistry<R: ServiceRepository> {
    repo: R,
    policy: TransitionPolicy,
    number_prefix: String,
    numbers: NumberSequence,
    schedule: ScheduleFormatter,
    newly_added: NewlyAdded,
    bus: EventBus,
}

impl<R: ServiceRepository> ServiceRegistry<R> {
    /// Create a registry over `repo` configured by `config`.
    pub fn new(repo: R, config: &RegistryConfig) -> Self {
        let bus = EventBus::new(config.event_capacity);
        Self {
            repo,
            policy: config.transition_policy,
            number_prefix: config.number_prefix.clone(),
            numbers: NumberSequence::new(config.number_prefix.clone(), config.number_start),
            schedule: ScheduleFormatter::new(&config.locale),
            newly_added: NewlyAdded::new(
                Duration::from_millis(config.highlight_ttl_ms),
                bus.clone(),
            ),
            bus,
        }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<ServiceEvent> {
        self.bus.subscribe()
    }

    /// Load existing records (e.g. fixtures) in registry order.
    ///
    /// Display numbering continues after the highest seeded number. Seeding
    /// publishes no events and does not touch the newly-added designation.
    pub async fn seed(&self, records: Vec<ServiceRecord>) -> Result<(), ServiceError> {
        for record in &records {
            if let Some(seq) = parse_number(&self.number_prefix, &record.number) {
                self.numbers.advance_past(seq);
            }
        }
        self.repo.prepend(&records).await?;
        tracing::debug!(count = records.len(), "seeded service registry");
        Ok(())
    }

    /// Create one record per requested trip, backed by `authorization`.
    ///
    /// Records are placed ahead of every existing record, in entry order. The
    /// first new record becomes the newly-added designation. An empty entry
    /// list creates nothing and leaves the designation alone.
    #[tracing::instrument(
        name = "create_services",
        skip(self, authorization, entries),
        fields(voucher_ref = %authorization.voucher_ref, count = entries.len())
    )]
    pub async fn create_services(
        &self,
        authorization: &Authorization,
        entries: Vec<RequestedTrip>,
    ) -> Result<Vec<ServiceRecord>, ServiceError> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let records = entries
            .into_iter()
            .map(|trip| self.build_record(authorization, trip, now))
            .collect::<Result<Vec<_>, _>>()?;

        self.repo.prepend(&records).await?;

        let ids: Vec<ServiceId> = records.iter().map(|r| r.id).collect();
        if let Some(first) = ids.first() {
            self.newly_added.mark(*first);
        }
        tracing::debug!(first = ?ids.first(), "created services");
        self.bus.publish(ServiceEvent::Created { ids });

        Ok(records)
    }

    /// Single-trip form of [`create_services`](Self::create_services).
    pub async fn create_service(
        &self,
        authorization: &Authorization,
        entry: RequestedTrip,
    ) -> Result<ServiceRecord, ServiceError> {
        let mut created = self.create_services(authorization, vec![entry]).await?;
        created
            .pop()
            .ok_or_else(|| ServiceError::Storage("creation returned no record".to_string()))
    }

    fn build_record(
        &self,
        authorization: &Authorization,
        trip: RequestedTrip,
        now: chrono::DateTime<Utc>,
    ) -> Result<ServiceRecord, ServiceError> {
        let number = self
            .numbers
            .next_number()
            .ok_or(ServiceError::NumbersExhausted)?;
        let schedule = self.schedule.format(trip.requested_for.as_deref());
        Ok(ServiceRecord {
            id: ServiceId::new(),
            number,
            authorization_id: authorization.id,
            voucher_ref: authorization.voucher_ref.clone(),
            voucher_date: authorization.voucher_date,
            authorized_rate: authorization.rate_code.clone(),
            contracted_date: schedule.contracted_date,
            scheduled_date_time: schedule.scheduled_date_time,
            origin: trip.origin,
            destination: trip.destination,
            origin_city: trip.origin_city,
            destination_city: trip.destination_city,
            origin_detail: trip.origin_detail,
            destination_detail: trip.destination_detail,
            notes: trip.notes,
            status: ServiceStatus::Pending,
            driver: None,
            plate: None,
            requested_at: now,
            cancellation_requested_at: None,
            cancellation_resolved_at: None,
            is_authorized: true,
            signature: SignatureInfo::placeholder(),
        })
    }

    /// Replace the stored record with the same id by `record`, field for field.
    ///
    /// Unknown ids are a no-op returning `Ok(None)`. Under the strict policy
    /// a status change must be a lifecycle edge and leave the record carrying
    /// what its new status needs (crew when scheduled, cancellation stamps),
    /// and driver/plate must be set together.
    pub async fn update_service(
        &self,
        record: ServiceRecord,
    ) -> Result<Option<ServiceRecord>, ServiceError> {
        let Some(stored) = self.repo.get(&record.id).await? else {
            tracing::debug!(service_id = %record.id, "update for unknown service ignored");
            return Ok(None);
        };

        if self.policy == TransitionPolicy::Strict {
            if stored.status != record.status {
                check_transition(self.policy, record.id, stored.status, record.status)?;
                check_status_fields(&record)?;
            }
            if !record.has_consistent_assignment() {
                return Err(ServiceError::InvalidAssignment(
                    "driver and plate must be set together".to_string(),
                ));
            }
        }

        if !self.repo.replace(&record).await? {
            return Ok(None);
        }

        tracing::debug!(service_id = %record.id, number = %record.number, status = %record.status, "updated service");
        self.bus.publish(ServiceEvent::Updated { id: record.id });
        Ok(Some(record))
    }

    /// Move a record to `CancellationRequested` and stamp the request time.
    ///
    /// The permissive policy applies this from any status, including terminal
    /// ones. Callers decide whether to offer the action (see
    /// [`can_request_cancellation`](crate::lifecycle::can_request_cancellation)).
    pub async fn request_cancellation(
        &self,
        id: &ServiceId,
    ) -> Result<Option<ServiceRecord>, ServiceError> {
        let mut previous = None;
        let updated = self
            .transition(id, ServiceStatus::CancellationRequested, |record| {
                previous = Some(record.status);
                record.cancellation_requested_at = Some(Utc::now());
            })
            .await?;

        if let (Some(record), Some(previous)) = (&updated, previous) {
            self.bus.publish(ServiceEvent::CancellationRequested {
                id: record.id,
                previous,
            });
        }
        Ok(updated)
    }

    /// Settle a cancellation request: approve cancels, reject records a no-show.
    pub async fn resolve_cancellation(
        &self,
        id: &ServiceId,
        decision: CancellationDecision,
    ) -> Result<Option<ServiceRecord>, ServiceError> {
        let updated = self
            .transition(id, decision.target_status(), |record| {
                record.cancellation_resolved_at = Some(Utc::now());
            })
            .await?;

        if let Some(ref record) = updated {
            self.bus.publish(ServiceEvent::CancellationResolved {
                id: record.id,
                decision,
            });
        }
        Ok(updated)
    }

    /// Assign a driver and plate, programming the trip (`Scheduled`).
    pub async fn assign_service(
        &self,
        id: &ServiceId,
        assignment: Assignment,
    ) -> Result<Option<ServiceRecord>, ServiceError> {
        let driver = assignment.driver.trim().to_string();
        let plate = assignment.plate.trim().to_uppercase();
        if driver.is_empty() || plate.is_empty() {
            return Err(ServiceError::InvalidAssignment(
                "driver and plate are both required".to_string(),
            ));
        }

        let updated = self
            .transition(id, ServiceStatus::Scheduled, |record| {
                record.driver = Some(driver.clone());
                record.plate = Some(plate.clone());
            })
            .await?;

        if let Some(ref record) = updated {
            self.bus.publish(ServiceEvent::Assigned {
                id: record.id,
                driver,
                plate,
            });
        }
        Ok(updated)
    }

    /// Publish a pending record for assignment (`Open`).
    pub async fn open_service(&self, id: &ServiceId) -> Result<Option<ServiceRecord>, ServiceError> {
        let updated = self.transition(id, ServiceStatus::Open, |_| {}).await?;
        if let Some(ref record) = updated {
            self.bus.publish(ServiceEvent::Opened { id: record.id });
        }
        Ok(updated)
    }

    /// Record a carried-out trip with its proof-of-service signature.
    pub async fn complete_service(
        &self,
        id: &ServiceId,
        signature: SignatureInfo,
    ) -> Result<Option<ServiceRecord>, ServiceError> {
        let updated = self
            .transition(id, ServiceStatus::Completed, |record| {
                record.signature = signature;
            })
            .await?;
        if let Some(ref record) = updated {
            self.bus.publish(ServiceEvent::Completed { id: record.id });
        }
        Ok(updated)
    }

    /// Load, check against the policy, mutate, store.
    async fn transition<F>(
        &self,
        id: &ServiceId,
        to: ServiceStatus,
        apply: F,
    ) -> Result<Option<ServiceRecord>, ServiceError>
    where
        F: FnOnce(&mut ServiceRecord),
    {
        let Some(mut record) = self.repo.get(id).await? else {
            tracing::debug!(service_id = %id, %to, "transition for unknown service ignored");
            return Ok(None);
        };

        let from = record.status;
        check_transition(self.policy, *id, from, to)?;

        apply(&mut record);
        record.status = to;

        if !self.repo.replace(&record).await? {
            return Ok(None);
        }

        tracing::debug!(service_id = %id, number = %record.number, %from, %to, "service transitioned");
        Ok(Some(record))
    }

    /// Get a record by id.
    pub async fn get_service(&self, id: &ServiceId) -> Result<Option<ServiceRecord>, ServiceError> {
        Ok(self.repo.get(id).await?)
    }

    /// Find a record by its display number.
    pub async fn find_by_number(&self, number: &str) -> Result<Option<ServiceRecord>, ServiceError> {
        let records = self.repo.list(None).await?;
        Ok(records
            .into_iter()
            .find(|r| r.number.eq_ignore_ascii_case(number)))
    }

    /// List records in registry order (most recent first).
    pub async fn list_services(
        &self,
        filter: Option<ServiceFilter>,
    ) -> Result<Vec<ServiceRecord>, ServiceError> {
        Ok(self.repo.list(filter).await?)
    }

    /// Records awaiting a coordinator decision on cancellation.
    pub async fn pending_cancellations(&self) -> Result<Vec<ServiceRecord>, ServiceError> {
        self.list_services(Some(ServiceFilter {
            status: Some(ServiceStatus::CancellationRequested),
            ..Default::default()
        }))
        .await
    }

    /// Number of records held.
    pub async fn len(&self) -> Result<usize, ServiceError> {
        Ok(self.repo.count().await?)
    }

    pub async fn is_empty(&self) -> Result<bool, ServiceError> {
        Ok(self.len().await? == 0)
    }

    /// The most recently created record, while its designation lasts.
    pub fn newly_added(&self) -> Option<ServiceId> {
        self.newly_added.current()
    }

    /// Drop the newly-added designation now.
    pub fn clear_newly_added(&self) -> Option<ServiceId> {
        self.newly_added.clear()
    }
}

impl<R: ServiceRepository + std::fmt::Debug> std::fmt::Debug for ServiceRegistry<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("repo", &self.repo)
            .field("policy", &self.policy)
            .field("next_number", &self.numbers.peek())
            .field("newly_added", &self.newly_added)
            .finish()
    }
}
