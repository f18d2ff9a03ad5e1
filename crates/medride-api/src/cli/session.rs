//! Interactive session for the user and coordinator roles (`medride session`).
//!
//! Both roles work on the same registry for the lifetime of the process.
//! Lifecycle events are logged through tracing by a background task so that
//! `-v` shows what each action did to the registry.

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input, Select};
use tokio::sync::broadcast::error::RecvError;

use medride_core::lifecycle::can_request_cancellation;
use medride_types::authorization::Authorization;
use medride_types::error::ServiceError;
use medride_types::service::{
    Assignment, CancellationDecision, RequestedTrip, ServiceRecord, ServiceStatus, SignatureInfo,
};

use crate::cli::Role;
use crate::cli::render::{self, format_status};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserAction {
    RequestTrips,
    RequestCancellation,
    ListServices,
    Quit,
}

impl UserAction {
    const ALL: [UserAction; 4] = [
        UserAction::RequestTrips,
        UserAction::RequestCancellation,
        UserAction::ListServices,
        UserAction::Quit,
    ];

    fn label(&self) -> &'static str {
        match self {
            UserAction::RequestTrips => "Request trips",
            UserAction::RequestCancellation => "Request a cancellation",
            UserAction::ListServices => "My services",
            UserAction::Quit => "Quit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoordinatorAction {
    ListServices,
    OpenService,
    AssignService,
    ResolveCancellation,
    CompleteService,
    Quit,
}

impl CoordinatorAction {
    const ALL: [CoordinatorAction; 6] = [
        CoordinatorAction::ListServices,
        CoordinatorAction::OpenService,
        CoordinatorAction::AssignService,
        CoordinatorAction::ResolveCancellation,
        CoordinatorAction::CompleteService,
        CoordinatorAction::Quit,
    ];

    fn label(&self) -> &'static str {
        match self {
            CoordinatorAction::ListServices => "All services",
            CoordinatorAction::OpenService => "Open a pending service",
            CoordinatorAction::AssignService => "Assign driver and plate",
            CoordinatorAction::ResolveCancellation => "Resolve a cancellation request",
            CoordinatorAction::CompleteService => "Mark a service completed",
            CoordinatorAction::Quit => "Quit",
        }
    }
}

/// One-line description of a record for selection menus.
fn service_label(record: &ServiceRecord) -> String {
    let when = if record.scheduled_date_time.is_empty() {
        "no date"
    } else {
        record.scheduled_date_time.as_str()
    };
    format!(
        "{}  {}  {} → {}  [{}]",
        record.number,
        when,
        record.origin_city,
        record.destination_city,
        record.status.as_str().to_lowercase()
    )
}

fn authorization_label(authorization: &Authorization) -> String {
    format!(
        "{}  {}  ({} of {} trips left)",
        authorization.voucher_ref,
        authorization.rate_code,
        authorization.available(),
        authorization.total_trips
    )
}

/// Run an interactive session until the user quits.
pub async fn run_session(state: &AppState, role: Role) -> Result<()> {
    let events = spawn_event_logger(state);

    println!();
    println!(
        "  {} MedRide session as {} ({} policy)",
        style("▶").cyan().bold(),
        style(format!("{role:?}").to_lowercase()).bold(),
        format!("{:?}", state.registry.policy()).to_lowercase()
    );

    let outcome = match role {
        Role::User => user_loop(state).await,
        Role::Coordinator => coordinator_loop(state).await,
    };

    events.abort();
    outcome
}

/// Log every lifecycle event published while the session runs.
fn spawn_event_logger(state: &AppState) -> tokio::task::JoinHandle<()> {
    let mut rx = state.registry.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => tracing::info!(service_id = ?event.service_id(), ?event, "service event"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event logger lagged behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

async fn user_loop(state: &AppState) -> Result<()> {
    let labels: Vec<&str> = UserAction::ALL.iter().map(UserAction::label).collect();
    loop {
        println!();
        let selection = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match UserAction::ALL[selection] {
            UserAction::RequestTrips => request_trips(state).await?,
            UserAction::RequestCancellation => request_cancellation(state).await?,
            UserAction::ListServices => show_services(state).await?,
            UserAction::Quit => return Ok(()),
        }
    }
}

async fn coordinator_loop(state: &AppState) -> Result<()> {
    let labels: Vec<&str> = CoordinatorAction::ALL
        .iter()
        .map(CoordinatorAction::label)
        .collect();
    loop {
        println!();
        let selection = Select::new()
            .with_prompt("Dispatch action")
            .items(&labels)
            .default(0)
            .interact()?;

        match CoordinatorAction::ALL[selection] {
            CoordinatorAction::ListServices => show_services(state).await?,
            CoordinatorAction::OpenService => open_service(state).await?,
            CoordinatorAction::AssignService => assign_service(state).await?,
            CoordinatorAction::ResolveCancellation => resolve_cancellation(state).await?,
            CoordinatorAction::CompleteService => complete_service(state).await?,
            CoordinatorAction::Quit => return Ok(()),
        }
    }
}

async fn show_services(state: &AppState) -> Result<()> {
    let records = state.registry.list_services(None).await?;
    render::print_services(&records, state.registry.newly_added());
    Ok(())
}

/// Let the operator pick one of `records`, or go back.
fn pick_service(records: &[ServiceRecord], prompt: &str) -> Result<Option<ServiceRecord>> {
    if records.is_empty() {
        println!("  {} Nothing to act on.", style("i").blue().bold());
        return Ok(None);
    }

    let mut items: Vec<String> = records.iter().map(service_label).collect();
    items.push("← Back".to_string());

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()?;

    Ok(records.get(selection).cloned())
}

/// Print the result of a registry action; policy refusals do not end the session.
fn report(result: Result<Option<ServiceRecord>, ServiceError>, done: &str) -> Result<()> {
    match result {
        Ok(Some(record)) => {
            println!(
                "  {} {} {} ({})",
                style("✓").green().bold(),
                done,
                style(&record.number).cyan(),
                format_status(record.status)
            );
            Ok(())
        }
        Ok(None) => {
            println!("  {} Service no longer exists.", style("!").yellow().bold());
            Ok(())
        }
        Err(e @ (ServiceError::InvalidTransition { .. } | ServiceError::InvalidAssignment(_))) => {
            println!("  {} {}", style("✗").red().bold(), e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn request_trips(state: &AppState) -> Result<()> {
    let authorizations: Vec<Authorization> = state
        .catalog
        .list()
        .into_iter()
        .filter(|a| a.available() > 0)
        .collect();
    if authorizations.is_empty() {
        println!("  {} No authorization has trips left.", style("!").yellow().bold());
        return Ok(());
    }

    let items: Vec<String> = authorizations.iter().map(authorization_label).collect();
    let selection = Select::new()
        .with_prompt("Authorization")
        .items(&items)
        .default(0)
        .interact()?;
    let authorization = &authorizations[selection];

    let mut trips = Vec::new();
    loop {
        println!();
        println!("  {}", style(format!("── Trip {} ──", trips.len() + 1)).dim());
        trips.push(prompt_trip()?);

        let more = Confirm::new()
            .with_prompt("Add another trip to this request?")
            .default(false)
            .interact()?;
        if !more {
            break;
        }
    }

    let created = state.registry.create_services(authorization, trips).await?;
    println!();
    println!(
        "  {} {} trip{} requested against {}",
        style("✓").green().bold(),
        created.len(),
        if created.len() == 1 { "" } else { "s" },
        style(&authorization.voucher_ref).cyan()
    );
    show_services(state).await
}

fn prompt_trip() -> Result<RequestedTrip> {
    let text = |prompt: &str| -> Result<String> {
        Ok(Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?)
    };

    let origin = text("Pick-up address")?;
    let origin_city = text("Pick-up city")?;
    let origin_detail = text("Pick-up details (apartment, gate...)")?;
    let destination = text("Destination address")?;
    let destination_city = text("Destination city")?;
    let destination_detail = text("Destination details")?;
    let requested_for = text("Date and time (YYYY-MM-DDTHH:MM)")?;
    let notes = text("Notes for the crew")?;

    Ok(RequestedTrip {
        origin,
        destination,
        origin_city,
        destination_city,
        origin_detail,
        destination_detail,
        notes,
        requested_for: Some(requested_for).filter(|s| !s.trim().is_empty()),
    })
}

async fn request_cancellation(state: &AppState) -> Result<()> {
    let records: Vec<ServiceRecord> = state
        .registry
        .list_services(None)
        .await?
        .into_iter()
        .filter(can_request_cancellation)
        .collect();

    let Some(record) = pick_service(&records, "Cancel which trip?")? else {
        return Ok(());
    };

    let confirmed = Confirm::new()
        .with_prompt(format!(
            "Ask the coordinator to cancel {}?",
            style(&record.number).cyan()
        ))
        .default(true)
        .interact()?;
    if !confirmed {
        println!("  Kept.");
        return Ok(());
    }

    report(
        state.registry.request_cancellation(&record.id).await,
        "Cancellation requested for",
    )
}

async fn services_in(state: &AppState, statuses: &[ServiceStatus]) -> Result<Vec<ServiceRecord>> {
    Ok(state
        .registry
        .list_services(None)
        .await?
        .into_iter()
        .filter(|r| statuses.contains(&r.status))
        .collect())
}

async fn open_service(state: &AppState) -> Result<()> {
    let records = services_in(state, &[ServiceStatus::Pending]).await?;
    let Some(record) = pick_service(&records, "Open which service?")? else {
        return Ok(());
    };
    report(state.registry.open_service(&record.id).await, "Opened")
}

async fn assign_service(state: &AppState) -> Result<()> {
    let records = services_in(state, &[ServiceStatus::Pending, ServiceStatus::Open]).await?;
    let Some(record) = pick_service(&records, "Assign which service?")? else {
        return Ok(());
    };

    let driver: String = Input::new().with_prompt("Driver").interact_text()?;
    let plate: String = Input::new().with_prompt("Plate").interact_text()?;

    report(
        state
            .registry
            .assign_service(&record.id, Assignment { driver, plate })
            .await,
        "Scheduled",
    )
}

async fn resolve_cancellation(state: &AppState) -> Result<()> {
    let records = state.registry.pending_cancellations().await?;
    let Some(record) = pick_service(&records, "Resolve which request?")? else {
        return Ok(());
    };

    let decisions = [CancellationDecision::Approve, CancellationDecision::Reject];
    let items = ["Approve (cancel the trip)", "Reject (record a no-show)"];
    let selection = Select::new()
        .with_prompt(format!("Decision for {}", record.number))
        .items(&items)
        .default(0)
        .interact()?;

    report(
        state
            .registry
            .resolve_cancellation(&record.id, decisions[selection])
            .await,
        "Resolved",
    )
}

async fn complete_service(state: &AppState) -> Result<()> {
    let records = services_in(state, &[ServiceStatus::Scheduled]).await?;
    let Some(record) = pick_service(&records, "Complete which service?")? else {
        return Ok(());
    };

    let size: u64 = Input::new()
        .with_prompt("Signature size in bytes (0 if none was captured)")
        .default(0)
        .interact_text()?;
    let signature = if size > 0 {
        SignatureInfo::captured(size)
    } else {
        SignatureInfo::placeholder()
    };

    report(
        state.registry.complete_service(&record.id, signature).await,
        "Completed",
    )
}
