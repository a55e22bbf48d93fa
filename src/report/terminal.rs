use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::filter::ClientFilter;
use crate::models::{ClientRecord, DataSource, Status};
use crate::report::{format_brl, format_months, percent, Dashboard};

/// Render the dashboard: summary box, status breakdown and squad metrics.
pub fn render_dashboard(dashboard: &Dashboard, quiet: bool) {
    let stats = dashboard.stats;

    if quiet {
        println!(
            "Clients: {}  Fee: {}  LT: {}  Ticket: {}  Danger: {}",
            stats.total_count,
            format_brl(stats.total_fee),
            format_months(stats.average_lifetime),
            format_brl(stats.average_ticket),
            stats.status_count(Status::Danger).to_string().red(),
        );
        return;
    }

    print_header(dashboard.source, dashboard.squad, &dashboard.generated_at);

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<49} │", "SUMMARY".bold());
    println!(" │  {:<49} │", format!("Clients         : {}", stats.total_count));
    println!(" │  {:<49} │", format!("Total fee       : {}", format_brl(stats.total_fee)));
    println!(
        " │  {:<49} │",
        format!("Average LT      : {}", format_months(stats.average_lifetime))
    );
    println!(
        " │  {:<49} │",
        format!("Average ticket  : {}", format_brl(stats.average_ticket))
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    println!(" {} Client status:\n", "[STATUS]".cyan().bold());
    let mut table = new_table(&["Status", "Clients", "Share"]);
    for status in Status::ALL {
        let count = stats.status_count(status);
        table.add_row(vec![
            Cell::new(format!("● {}", status)).fg(status_color(status)),
            Cell::new(count).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", percent(count, stats.total_count)))
                .set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{}\n", table);

    if stats.count_by_group.is_empty() {
        return;
    }

    println!(" {} Metrics by squad:\n", "[SQUADS]".cyan().bold());
    let mut table = new_table(&["Squad", "Clients", "Fee", "Avg LT", "Ticket"]);
    for (group, count) in &stats.count_by_group {
        let fee = stats.sum_fee_by_group.get(group).copied().unwrap_or(0.0);
        let lt = stats.avg_lifetime_by_group.get(group).copied().unwrap_or(0.0);
        let ticket = stats.avg_ticket_by_group.get(group).copied().unwrap_or(0.0);
        table.add_row(vec![
            Cell::new(group),
            Cell::new(count).set_alignment(CellAlignment::Right),
            Cell::new(format_brl(fee)).set_alignment(CellAlignment::Right),
            Cell::new(format_months(lt)).set_alignment(CellAlignment::Right),
            Cell::new(format_brl(ticket)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{}\n", table);
}

/// Render the filtered client list.
pub fn render_clients(
    records: &[ClientRecord],
    source: DataSource,
    filter: &ClientFilter,
    generated_at: &str,
    quiet: bool,
) {
    let suffix = if filter.is_active() {
        " with the applied filters"
    } else {
        ""
    };

    if quiet {
        println!("{} client(s) found{}", records.len(), suffix);
        return;
    }

    print_header(source, filter.group_label(), generated_at);

    if records.is_empty() {
        println!(" No clients match the applied filters.\n");
        return;
    }

    let mut table = new_table(&["Name", "Squad", "Fee", "LT (months)", "Status"]);
    for record in records {
        table.add_row(vec![
            Cell::new(&record.name),
            Cell::new(&record.group),
            Cell::new(format_brl(record.fee)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}", record.lifetime_months))
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("● {}", record.status)).fg(status_color(record.status)),
        ]);
    }
    println!("{}", table);
    println!("\n {} client(s) found{}\n", records.len(), suffix);
}

fn print_header(source: DataSource, squad: &str, generated_at: &str) {
    println!(
        "\n {} v{}",
        "client-pulse".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        " Data source: {}   Squad: {}   Updated: {}\n",
        source.to_string().cyan(),
        squad,
        generated_at
    );
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

fn status_color(status: Status) -> Color {
    let (r, g, b) = status.rgb();
    Color::Rgb { r, g, b }
}
