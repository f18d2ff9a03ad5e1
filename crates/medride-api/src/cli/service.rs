//! Service listing CLI commands: list, show.

use anyhow::{Result, bail};
use console::style;

use medride_core::repository::service::ServiceFilter;
use medride_types::service::ServiceStatus;

use crate::cli::render;
use crate::state::AppState;

/// List services, most recent first.
///
/// # Examples
///
/// ```bash
/// medride list
/// medride list --status cancellation_requested
/// medride list --voucher AUT-2024-0001 --limit 3
/// ```
pub async fn list_services(
    state: &AppState,
    status: Option<String>,
    voucher: Option<String>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let status = match status {
        Some(s) => Some(s.parse::<ServiceStatus>().map_err(|e| anyhow::anyhow!(e))?),
        None => None,
    };

    let filter = ServiceFilter {
        status,
        voucher_ref: voucher.map(|v| v.trim().to_uppercase()),
        limit,
    };

    let records = state.registry.list_services(Some(filter)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    render::print_services(&records, state.registry.newly_added());
    Ok(())
}

/// Show the full profile of one service.
pub async fn show_service(state: &AppState, number: &str, json: bool) -> Result<()> {
    let Some(record) = state.registry.find_by_number(number).await? else {
        bail!("service '{number}' not found");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    render::print_service_detail(&record);

    if !record.status.is_terminal() {
        println!(
            "  {} Manage it with: {}",
            style("→").dim(),
            style("medride session --role coordinator").yellow()
        );
        println!();
    }
    Ok(())
}
