//! End-to-end tests of `ServiceRegistry` over the in-memory repository.

use std::collections::HashSet;
use std::time::Duration;

use medride_core::lifecycle::can_request_cancellation;
use medride_core::service::registry::ServiceRegistry;
use medride_infra::fixtures;
use medride_infra::memory::InMemoryServiceRepository;
use medride_types::authorization::Authorization;
use medride_types::config::{LocaleConfig, RegistryConfig, TransitionPolicy};
use medride_types::error::ServiceError;
use medride_types::event::ServiceEvent;
use medride_types::service::{
    Assignment, CancellationDecision, RequestedTrip, ServiceId, ServiceStatus, SignatureInfo,
};

type Registry = ServiceRegistry<InMemoryServiceRepository>;

fn registry() -> Registry {
    ServiceRegistry::new(InMemoryServiceRepository::new(), &RegistryConfig::default())
}

fn strict_registry() -> Registry {
    let config = RegistryConfig {
        transition_policy: TransitionPolicy::Strict,
        ..Default::default()
    };
    ServiceRegistry::new(InMemoryServiceRepository::new(), &config)
}

fn authorization() -> Authorization {
    fixtures::authorizations().remove(0)
}

fn trip(destination: &str, when: Option<&str>) -> RequestedTrip {
    RequestedTrip {
        origin: "Cra 15 #93-40".to_string(),
        destination: destination.to_string(),
        origin_city: "Bogotá".to_string(),
        destination_city: "Bogotá".to_string(),
        requested_for: when.map(str::to_string),
        ..Default::default()
    }
}

async fn single(registry: &Registry) -> ServiceId {
    registry
        .create_service(&authorization(), trip("Clinic", Some("2024-06-01T09:00")))
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn create_services_returns_one_pending_record_per_entry() {
    let registry = registry();
    let auth = authorization();
    let entries = vec![
        trip("Clinic A", Some("2024-06-01T09:00")),
        trip("Clinic B", None),
        trip("Clinic C", Some("not a date")),
    ];

    let created = registry.create_services(&auth, entries).await.unwrap();

    assert_eq!(created.len(), 3);
    let ids: HashSet<_> = created.iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), 3);
    for record in &created {
        assert_eq!(record.status, ServiceStatus::Pending);
        assert!(record.driver.is_none());
        assert!(record.plate.is_none());
        assert!(record.cancellation_requested_at.is_none());
        assert!(record.cancellation_resolved_at.is_none());
        assert!(record.is_authorized);
        assert_eq!(record.signature, SignatureInfo::placeholder());
        assert_eq!(record.voucher_ref, auth.voucher_ref);
        assert_eq!(record.voucher_date, auth.voucher_date);
        assert_eq!(record.authorized_rate, auth.rate_code);
    }

    assert_eq!(created[0].contracted_date, "01/06/2024");
    assert_eq!(created[0].scheduled_date_time, "01/06/2024 09:00");
    assert_eq!(created[1].scheduled_date_time, "");
    assert_eq!(created[2].contracted_date, "");

    let numbers: Vec<_> = created.iter().map(|r| r.number.as_str()).collect();
    assert_eq!(numbers, vec!["SRV-000001", "SRV-000002", "SRV-000003"]);
}

#[tokio::test]
async fn new_records_precede_existing_ones() {
    let registry = registry();
    let auth = authorization();
    let first = registry
        .create_services(&auth, vec![trip("A", None), trip("B", None)])
        .await
        .unwrap();
    let second = registry
        .create_services(&auth, vec![trip("C", None), trip("D", None)])
        .await
        .unwrap();

    let listed: Vec<_> = registry
        .list_services(None)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(
        listed,
        vec![second[0].id, second[1].id, first[0].id, first[1].id]
    );
}

#[tokio::test]
async fn empty_creation_is_a_no_op() {
    let registry = registry();
    let created = registry.create_services(&authorization(), Vec::new()).await.unwrap();
    assert!(created.is_empty());
    assert!(registry.is_empty().await.unwrap());
    assert_eq!(registry.newly_added(), None);
}

#[tokio::test]
async fn update_service_replaces_and_is_idempotent() {
    let registry = registry();
    let id = single(&registry).await;

    let mut modified = registry.get_service(&id).await.unwrap().unwrap();
    modified.notes = "Oxygen tank on board".to_string();

    let first = registry.update_service(modified.clone()).await.unwrap();
    assert_eq!(first.as_ref(), Some(&modified));
    let after_once = registry.list_services(None).await.unwrap();

    registry.update_service(modified.clone()).await.unwrap();
    let after_twice = registry.list_services(None).await.unwrap();

    assert_eq!(after_once, after_twice);
    assert_eq!(
        registry.get_service(&id).await.unwrap().unwrap().notes,
        "Oxygen tank on board"
    );
}

#[tokio::test]
async fn update_unknown_service_is_silent() {
    let registry = registry();
    single(&registry).await;
    let before = registry.list_services(None).await.unwrap();

    let stray = fixtures::pending_record(&authorization(), "SRV-999999");
    assert!(registry.update_service(stray).await.unwrap().is_none());
    assert_eq!(registry.list_services(None).await.unwrap(), before);
}

#[tokio::test]
async fn request_cancellation_sets_status_and_stamp() {
    let registry = registry();
    let id = single(&registry).await;

    let record = registry.request_cancellation(&id).await.unwrap().unwrap();
    assert_eq!(record.status, ServiceStatus::CancellationRequested);
    assert!(record.cancellation_requested_at.is_some());
    assert!(record.cancellation_resolved_at.is_none());
}

#[tokio::test]
async fn request_cancellation_unknown_id_leaves_registry_unchanged() {
    let registry = registry();
    single(&registry).await;
    let before = registry.list_services(None).await.unwrap();

    let result = registry.request_cancellation(&ServiceId::new()).await.unwrap();
    assert!(result.is_none());
    assert_eq!(registry.list_services(None).await.unwrap(), before);
}

#[tokio::test]
async fn resolve_cancellation_approve_and_reject() {
    let registry = registry();
    let approved = single(&registry).await;
    let rejected = single(&registry).await;
    registry.request_cancellation(&approved).await.unwrap();
    registry.request_cancellation(&rejected).await.unwrap();

    let a = registry
        .resolve_cancellation(&approved, CancellationDecision::Approve)
        .await
        .unwrap()
        .unwrap();
    let r = registry
        .resolve_cancellation(&rejected, CancellationDecision::Reject)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(a.status, ServiceStatus::Cancelled);
    assert_eq!(r.status, ServiceStatus::NoShow);
    assert!(a.cancellation_resolved_at.is_some());
    assert!(r.cancellation_resolved_at.is_some());
    assert!(registry.pending_cancellations().await.unwrap().is_empty());
}

#[tokio::test]
async fn cancelled_record_can_be_requested_again_under_permissive_policy() {
    let registry = registry();
    let x = single(&registry).await;

    let requested = registry.request_cancellation(&x).await.unwrap().unwrap();
    assert_eq!(requested.status, ServiceStatus::CancellationRequested);

    let resolved = registry
        .resolve_cancellation(&x, CancellationDecision::Approve)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.status, ServiceStatus::Cancelled);
    assert!(resolved.status.is_terminal());

    // Terminal, yet the request still goes through unconditionally.
    let again = registry.request_cancellation(&x).await.unwrap().unwrap();
    assert_eq!(again.status, ServiceStatus::CancellationRequested);
}

#[tokio::test]
async fn scheduled_record_can_be_requested_under_permissive_policy() {
    let registry = registry();
    let x = single(&registry).await;
    let assigned = registry
        .assign_service(
            &x,
            Assignment {
                driver: "Carlos Rojas".to_string(),
                plate: "WMK-482".to_string(),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(assigned.status, ServiceStatus::Scheduled);
    assert!(!can_request_cancellation(&assigned));

    // Offering the action is the caller's call; the registry applies it.
    let requested = registry.request_cancellation(&x).await.unwrap().unwrap();
    assert_eq!(requested.status, ServiceStatus::CancellationRequested);
    assert!(requested.cancellation_requested_at.is_some());
    assert_eq!(requested.driver.as_deref(), Some("Carlos Rojas"));
}

#[tokio::test]
async fn strict_policy_rejects_request_on_terminal_record() {
    let registry = strict_registry();
    let x = single(&registry).await;
    registry.request_cancellation(&x).await.unwrap();
    registry
        .resolve_cancellation(&x, CancellationDecision::Approve)
        .await
        .unwrap();

    let err = registry.request_cancellation(&x).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidTransition {
            from: ServiceStatus::Cancelled,
            to: ServiceStatus::CancellationRequested,
            ..
        }
    ));
    let stored = registry.get_service(&x).await.unwrap().unwrap();
    assert_eq!(stored.status, ServiceStatus::Cancelled);
}

#[tokio::test]
async fn strict_policy_rejects_resolution_without_request() {
    let registry = strict_registry();
    let x = single(&registry).await;
    let err = registry
        .resolve_cancellation(&x, CancellationDecision::Reject)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition { .. }));
}

#[tokio::test]
async fn strict_policy_guards_updates() {
    let registry = strict_registry();
    let x = single(&registry).await;
    let stored = registry.get_service(&x).await.unwrap().unwrap();

    let mut skip_ahead = stored.clone();
    skip_ahead.status = ServiceStatus::Completed;
    assert!(matches!(
        registry.update_service(skip_ahead).await,
        Err(ServiceError::InvalidTransition { .. })
    ));

    let mut half_assigned = stored.clone();
    half_assigned.driver = Some("Carlos Rojas".to_string());
    assert!(matches!(
        registry.update_service(half_assigned).await,
        Err(ServiceError::InvalidAssignment(_))
    ));

    let mut scheduled_without_crew = stored.clone();
    scheduled_without_crew.status = ServiceStatus::Scheduled;
    assert!(matches!(
        registry.update_service(scheduled_without_crew).await,
        Err(ServiceError::MissingField {
            status: ServiceStatus::Scheduled,
            field: "driver",
        })
    ));

    let mut requested_without_stamp = stored.clone();
    requested_without_stamp.status = ServiceStatus::CancellationRequested;
    assert!(matches!(
        registry.update_service(requested_without_stamp).await,
        Err(ServiceError::MissingField {
            field: "cancellation_requested_at",
            ..
        })
    ));

    // None of the refused updates reached the store.
    let unchanged = registry.get_service(&x).await.unwrap().unwrap();
    assert_eq!(unchanged, stored);
    assert!(can_request_cancellation(&unchanged));

    let mut scheduled = stored.clone();
    scheduled.status = ServiceStatus::Scheduled;
    scheduled.driver = Some("Carlos Rojas".to_string());
    scheduled.plate = Some("WMK-482".to_string());
    assert!(registry.update_service(scheduled).await.unwrap().is_some());

    let mut completed_without_resolution = registry.get_service(&x).await.unwrap().unwrap();
    completed_without_resolution.status = ServiceStatus::Completed;
    assert!(registry.update_service(completed_without_resolution).await.unwrap().is_some());
}

#[tokio::test]
async fn strict_update_into_resolution_needs_stamp() {
    let registry = strict_registry();
    let x = single(&registry).await;
    let requested = registry.request_cancellation(&x).await.unwrap().unwrap();

    let mut cancelled = requested.clone();
    cancelled.status = ServiceStatus::Cancelled;
    assert!(matches!(
        registry.update_service(cancelled.clone()).await,
        Err(ServiceError::MissingField {
            field: "cancellation_resolved_at",
            ..
        })
    ));

    cancelled.cancellation_resolved_at = Some(chrono::Utc::now());
    let stored = registry.update_service(cancelled).await.unwrap().unwrap();
    assert_eq!(stored.status, ServiceStatus::Cancelled);
}

#[tokio::test]
async fn opening_through_update_is_allowed_under_strict_policy() {
    let registry = strict_registry();
    let x = single(&registry).await;
    let mut opened = registry.get_service(&x).await.unwrap().unwrap();
    opened.status = ServiceStatus::Open;
    assert!(registry.update_service(opened).await.unwrap().is_some());
}

#[tokio::test]
async fn coordinator_flow_assign_and_complete() {
    let registry = strict_registry();
    let x = single(&registry).await;

    let opened = registry.open_service(&x).await.unwrap().unwrap();
    assert_eq!(opened.status, ServiceStatus::Open);

    let assigned = registry
        .assign_service(
            &x,
            Assignment {
                driver: "  Luisa Gómez ".to_string(),
                plate: "sxt-119".to_string(),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(assigned.status, ServiceStatus::Scheduled);
    assert_eq!(assigned.driver.as_deref(), Some("Luisa Gómez"));
    assert_eq!(assigned.plate.as_deref(), Some("SXT-119"));
    assert!(!can_request_cancellation(&assigned));

    let completed = registry
        .complete_service(&x, SignatureInfo::captured(20_000))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(completed.status, ServiceStatus::Completed);
    assert!(completed.signature.present);
    assert!(completed.has_consistent_assignment());
}

#[tokio::test]
async fn assignment_requires_both_driver_and_plate() {
    let registry = registry();
    let x = single(&registry).await;
    let err = registry
        .assign_service(
            &x,
            Assignment {
                driver: "Carlos Rojas".to_string(),
                plate: "   ".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidAssignment(_)));

    let stored = registry.get_service(&x).await.unwrap().unwrap();
    assert!(stored.driver.is_none() && stored.plate.is_none());
    assert_eq!(stored.status, ServiceStatus::Pending);
}

#[tokio::test(start_paused = true)]
async fn newly_added_marks_first_record_and_expires() {
    let registry = registry();
    let created = registry
        .create_services(&authorization(), vec![trip("A", None), trip("B", None)])
        .await
        .unwrap();

    assert_eq!(registry.newly_added(), Some(created[0].id));

    tokio::time::advance(Duration::from_millis(3_001)).await;
    assert_eq!(registry.newly_added(), None);
}

#[tokio::test(start_paused = true)]
async fn newer_creation_supersedes_pending_expiry() {
    let registry = registry();
    let first = single(&registry).await;
    tokio::time::advance(Duration::from_secs(2)).await;
    let second = single(&registry).await;
    assert_ne!(first, second);

    tokio::time::advance(Duration::from_millis(1_500)).await;
    tokio::task::yield_now().await;
    assert_eq!(registry.newly_added(), Some(second));
}

#[tokio::test]
async fn newly_added_can_be_cleared_explicitly() {
    let registry = registry();
    let id = single(&registry).await;
    assert_eq!(registry.clear_newly_added(), Some(id));
    assert_eq!(registry.newly_added(), None);
}

#[tokio::test]
async fn lifecycle_events_are_published() {
    let registry = registry();
    let mut rx = registry.subscribe();

    let id = single(&registry).await;
    registry.request_cancellation(&id).await.unwrap();
    registry
        .resolve_cancellation(&id, CancellationDecision::Reject)
        .await
        .unwrap();

    assert_eq!(rx.recv().await.unwrap(), ServiceEvent::Created { ids: vec![id] });
    assert_eq!(
        rx.recv().await.unwrap(),
        ServiceEvent::CancellationRequested {
            id,
            previous: ServiceStatus::Pending
        }
    );
    assert_eq!(
        rx.recv().await.unwrap(),
        ServiceEvent::CancellationResolved {
            id,
            decision: CancellationDecision::Reject
        }
    );
}

#[tokio::test]
async fn seeding_continues_numbering_after_fixtures() {
    let registry = registry();
    registry.seed(fixtures::services(&LocaleConfig::default())).await.unwrap();
    assert_eq!(registry.len().await.unwrap(), fixtures::services(&LocaleConfig::default()).len());
    assert_eq!(registry.newly_added(), None);

    let created = registry
        .create_service(&authorization(), trip("Clinic", None))
        .await
        .unwrap();
    assert_eq!(created.number, "SRV-000007");

    let listed = registry.list_services(None).await.unwrap();
    assert_eq!(listed[0].id, created.id);
    assert_eq!(
        registry.find_by_number("srv-000004").await.unwrap().map(|r| r.status),
        Some(ServiceStatus::CancellationRequested)
    );
    assert_eq!(registry.pending_cancellations().await.unwrap().len(), 1);
}
