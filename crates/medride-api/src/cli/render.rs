//! Shared terminal rendering for service records.

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use medride_types::service::{ServiceId, ServiceRecord, ServiceStatus};

/// Colored table cell for a status.
pub fn status_cell(status: ServiceStatus) -> Cell {
    match status {
        ServiceStatus::Pending => Cell::new("● pending").fg(Color::Yellow),
        ServiceStatus::Open => Cell::new("◍ open").fg(Color::Blue),
        ServiceStatus::Scheduled => Cell::new("● scheduled").fg(Color::Green),
        ServiceStatus::CancellationRequested => Cell::new("◐ cancel requested").fg(Color::Magenta),
        ServiceStatus::Completed => Cell::new("✓ completed").fg(Color::DarkGreen),
        ServiceStatus::Cancelled => Cell::new("✗ cancelled").fg(Color::DarkGrey),
        ServiceStatus::NoShow => Cell::new("○ no-show").fg(Color::Red),
    }
}

/// Status as styled inline text.
pub fn format_status(status: ServiceStatus) -> String {
    let label = status.as_str().to_lowercase().replace('_', " ");
    match status {
        ServiceStatus::Pending => style(label).yellow().to_string(),
        ServiceStatus::Open => style(label).blue().to_string(),
        ServiceStatus::Scheduled => style(label).green().to_string(),
        ServiceStatus::CancellationRequested => style(label).magenta().to_string(),
        ServiceStatus::Completed => style(label).green().dim().to_string(),
        ServiceStatus::Cancelled => style(label).dim().to_string(),
        ServiceStatus::NoShow => style(label).red().to_string(),
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "—" } else { value }
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() > max {
        let cut: String = value.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        value.to_string()
    }
}

/// Table of services; the newly-added row (if any) is starred.
pub fn services_table(records: &[ServiceRecord], newly_added: Option<ServiceId>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Number").fg(Color::White),
        Cell::new("Scheduled").fg(Color::White),
        Cell::new("Route").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Crew").fg(Color::White),
        Cell::new("Voucher").fg(Color::White),
    ]);

    for record in records {
        let is_new = newly_added == Some(record.id);
        let number = if is_new {
            Cell::new(format!("★ {}", record.number)).fg(Color::Yellow)
        } else {
            Cell::new(&record.number).fg(Color::Cyan)
        };

        let route = format!(
            "{} ({}) → {} ({})",
            truncate(&record.origin, 24),
            record.origin_city,
            truncate(&record.destination, 24),
            record.destination_city
        );

        let crew = match record.assignment() {
            Some(a) => format!("{} · {}", a.driver, a.plate),
            None => "unassigned".to_string(),
        };

        table.add_row(vec![
            number,
            Cell::new(or_dash(&record.scheduled_date_time)),
            Cell::new(route),
            status_cell(record.status),
            Cell::new(crew).fg(Color::DarkGrey),
            Cell::new(&record.voucher_ref).fg(Color::DarkGrey),
        ]);
    }

    table
}

/// Print the table with a trailing count line.
pub fn print_services(records: &[ServiceRecord], newly_added: Option<ServiceId>) {
    if records.is_empty() {
        println!();
        println!("  {} No services found.", style("i").blue().bold());
        println!();
        return;
    }

    println!();
    println!("{}", services_table(records, newly_added));
    println!();
    println!(
        "  {} service{}",
        style(records.len()).bold(),
        if records.len() == 1 { "" } else { "s" }
    );
    println!();
}

/// Full profile of one record.
pub fn print_service_detail(record: &ServiceRecord) {
    println!();
    println!(
        "  {} {}",
        style(&record.number).cyan().bold(),
        format_status(record.status)
    );
    println!("  {}", style(record.id.to_string()).dim());
    println!();

    println!("  {}", style("── Trip ──").dim());
    println!("  {}        {}, {}", style("From:").bold(), record.origin, record.origin_city);
    if !record.origin_detail.is_empty() {
        println!("              {}", style(&record.origin_detail).dim());
    }
    println!(
        "  {}          {}, {}",
        style("To:").bold(),
        record.destination,
        record.destination_city
    );
    if !record.destination_detail.is_empty() {
        println!("              {}", style(&record.destination_detail).dim());
    }
    println!("  {}      {}", style("Date:").bold(), or_dash(&record.contracted_date));
    println!("  {}   {}", style("Pick-up:").bold(), or_dash(&record.scheduled_date_time));
    if !record.notes.is_empty() {
        println!("  {}     {}", style("Notes:").bold(), record.notes);
    }
    println!();

    println!("  {}", style("── Authorization ──").dim());
    println!("  {}   {}", style("Voucher:").bold(), record.voucher_ref);
    println!("  {}    {}", style("Issued:").bold(), record.voucher_date.format("%d/%m/%Y"));
    println!("  {}      {}", style("Rate:").bold(), record.authorized_rate);
    println!(
        "  {} {}",
        style("Authorized:").bold(),
        if record.is_authorized { "yes" } else { "no" }
    );
    println!();

    println!("  {}", style("── Dispatch ──").dim());
    println!(
        "  {}    {}",
        style("Driver:").bold(),
        record.driver.as_deref().unwrap_or("—")
    );
    println!(
        "  {}     {}",
        style("Plate:").bold(),
        record.plate.as_deref().unwrap_or("—")
    );
    println!(
        "  {} {}",
        style("Requested:").bold(),
        record.requested_at.format("%Y-%m-%d %H:%M UTC")
    );
    if let Some(at) = record.cancellation_requested_at {
        println!(
            "  {} {}",
            style("Cancel req:").bold(),
            at.format("%Y-%m-%d %H:%M UTC")
        );
    }
    if let Some(at) = record.cancellation_resolved_at {
        println!(
            "  {}  {}",
            style("Resolved:").bold(),
            at.format("%Y-%m-%d %H:%M UTC")
        );
    }
    let signature = &record.signature;
    println!(
        "  {} {}",
        style("Signature:").bold(),
        if signature.present {
            format!(
                "{} ({} bytes)",
                if signature.valid { "valid" } else { "invalid" },
                signature.size_bytes
            )
        } else {
            "not captured".to_string()
        }
    );
    println!();
}
