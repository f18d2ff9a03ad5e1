//! Authorization listing.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use medride_types::authorization::Authorization;

use crate::state::AppState;

fn availability_cell(authorization: &Authorization, today: NaiveDate) -> Cell {
    if !authorization.is_valid_on(today) {
        Cell::new("expired").fg(Color::DarkGrey)
    } else if authorization.available() == 0 {
        Cell::new("exhausted").fg(Color::Red)
    } else {
        Cell::new(format!(
            "{}/{} left",
            authorization.available(),
            authorization.total_trips
        ))
        .fg(Color::Green)
    }
}

/// List authorizations sorted by voucher reference.
pub async fn list_authorizations(state: &AppState, json: bool) -> Result<()> {
    let authorizations = state.catalog.list();

    if json {
        println!("{}", serde_json::to_string_pretty(&authorizations)?);
        return Ok(());
    }

    if authorizations.is_empty() {
        println!();
        println!("  {} No authorizations on file.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let today = Local::now().date_naive();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Voucher").fg(Color::White),
        Cell::new("Issued").fg(Color::White),
        Cell::new("Rate").fg(Color::White),
        Cell::new("Valid").fg(Color::White),
        Cell::new("Trips").fg(Color::White),
    ]);

    for auth in &authorizations {
        table.add_row(vec![
            Cell::new(&auth.voucher_ref).fg(Color::Cyan),
            Cell::new(auth.voucher_date.format("%d/%m/%Y")),
            Cell::new(&auth.rate_code),
            Cell::new(format!(
                "{} → {}",
                auth.valid_from.format("%d/%m/%Y"),
                auth.valid_until.format("%d/%m/%Y")
            ))
            .fg(Color::DarkGrey),
            availability_cell(auth, today),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}
