//! Scripted cancellation walkthrough.
//!
//! Creates one trip, asks for its cancellation, approves it, then asks again.
//! Under the permissive policy the second request reopens the cancelled trip;
//! under `--strict` it is refused.

use anyhow::{Result, anyhow};
use console::style;
use serde_json::json;

use medride_types::error::ServiceError;
use medride_types::service::{CancellationDecision, RequestedTrip, ServiceRecord};

use crate::cli::render::format_status;
use crate::state::AppState;

const VOUCHER: &str = "AUT-2024-0001";

fn demo_trip() -> RequestedTrip {
    RequestedTrip {
        origin: "Cra 7 # 45-10".to_string(),
        destination: "Clínica del Country".to_string(),
        origin_city: "Bogotá".to_string(),
        destination_city: "Bogotá".to_string(),
        origin_detail: "Apto 302".to_string(),
        destination_detail: "Torre B, consultorio 210".to_string(),
        notes: "Wheelchair user".to_string(),
        requested_for: Some("2024-06-01T08:30".to_string()),
    }
}

struct Step {
    label: &'static str,
    outcome: std::result::Result<ServiceRecord, String>,
}

fn print_step(index: usize, step: &Step) {
    match &step.outcome {
        Ok(record) => println!(
            "  {} {:<32} {} {}",
            style(format!("{index}.")).dim(),
            step.label,
            style(&record.number).cyan(),
            format_status(record.status)
        ),
        Err(reason) => println!(
            "  {} {:<32} {} {}",
            style(format!("{index}.")).dim(),
            step.label,
            style("refused").red().bold(),
            style(reason).dim()
        ),
    }
}

fn found(record: Option<ServiceRecord>) -> std::result::Result<ServiceRecord, String> {
    record.ok_or_else(|| "service no longer exists".to_string())
}

/// Run the walkthrough against the seeded registry.
pub async fn run_scenario(state: &AppState, json: bool) -> Result<()> {
    let authorization = state
        .catalog
        .find_by_voucher(VOUCHER)
        .ok_or_else(|| anyhow!("authorization '{VOUCHER}' not found"))?;

    let created = state
        .registry
        .create_service(&authorization, demo_trip())
        .await?;
    let id = created.id;

    let mut steps = vec![Step {
        label: "Trip requested",
        outcome: Ok(created),
    }];

    let requested = state.registry.request_cancellation(&id).await?;
    steps.push(Step {
        label: "Cancellation requested",
        outcome: found(requested),
    });

    let resolved = state
        .registry
        .resolve_cancellation(&id, CancellationDecision::Approve)
        .await?;
    steps.push(Step {
        label: "Cancellation approved",
        outcome: found(resolved),
    });

    let again = match state.registry.request_cancellation(&id).await {
        Ok(record) => found(record),
        Err(e @ ServiceError::InvalidTransition { .. }) => Err(e.to_string()),
        Err(e) => return Err(e.into()),
    };
    steps.push(Step {
        label: "Cancellation requested again",
        outcome: again,
    });

    if json {
        let out: Vec<_> = steps
            .iter()
            .map(|step| match &step.outcome {
                Ok(record) => json!({
                    "step": step.label,
                    "number": record.number,
                    "status": record.status,
                }),
                Err(reason) => json!({
                    "step": step.label,
                    "error": reason,
                }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Cancellation walkthrough ({} policy)",
        style("▶").cyan().bold(),
        style(format!("{:?}", state.registry.policy()).to_lowercase()).bold()
    );
    println!();
    for (i, step) in steps.iter().enumerate() {
        print_step(i + 1, step);
    }
    println!();
    Ok(())
}
