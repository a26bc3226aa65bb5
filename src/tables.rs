use std::fmt::Display;

use chrono::{DateTime, Local, Utc};
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use itertools::Itertools;

use crate::{
    api::{
        Backend,
        energyflow::{BillingHistory, Device},
    },
    calendar::{CalendarCell, DayMarker, Month},
    dashboard::{Dashboard, polling::PollStatus},
    quantity::cost::Cost,
    tariff::SlabCharge,
};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

fn format_local_time(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M:%S").to_string()
}

fn format_range<T: Display>((min, max): (T, T)) -> String {
    format!("{min:.1}…{max:.1}")
}

fn status_cell(status: &PollStatus) -> Cell {
    if !status.is_healthy() {
        let n_failures = status.n_consecutive_failures;
        let text = status.last_failure.as_ref().map_or_else(
            || format!("{n_failures} failures"),
            |failure| {
                let at = format_local_time(failure.at);
                format!("{n_failures} failures, last at {at}: {}", failure.error)
            },
        );
        Cell::new(text).fg(Color::Red)
    } else if let Some(last_success_at) = status.last_success_at {
        Cell::new(format!("ok at {}", format_local_time(last_success_at))).fg(Color::Green)
    } else {
        Cell::new("waiting").add_attribute(Attribute::Dim)
    }
}

pub fn build_live_table<B: Backend>(dashboard: &Dashboard<B>) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value", "Window (min…max)"]);

    let live = dashboard.live().copied().unwrap_or_default();
    let chart = dashboard.chart();
    table.add_row(vec![
        Cell::new("Voltage"),
        Cell::new(format!("{:.1}", live.voltage)).set_alignment(CellAlignment::Right),
        Cell::new(chart.voltage_range().map_or_else(String::new, format_range))
            .add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Power"),
        Cell::new(format!("{:.1}", live.power)).set_alignment(CellAlignment::Right),
        Cell::new(chart.power_range().map_or_else(String::new, format_range))
            .add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Measured at"),
        Cell::new(live.measured_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")),
        Cell::new(chart.latest().map_or_else(String::new, |sample| {
            format!("polled at {}", sample.at.format("%H:%M:%S"))
        }))
        .add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Total energy"),
        Cell::new(format!("{:.2}", live.total_energy)).set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Used since last reading"),
        Cell::new(format!("{:.2}", live.units_used)).set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Current bill"),
        Cell::new(dashboard.current_bill())
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Last bill"),
        Cell::new(live.last_bill).set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Billed this month"),
        Cell::new(dashboard.month_total()).set_alignment(CellAlignment::Right),
        Cell::new(dashboard.month()).add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Live feed"),
        status_cell(dashboard.live_status()),
        Cell::new(if chart.is_empty() {
            "no samples".to_owned()
        } else {
            format!("{} samples", chart.len())
        })
        .add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Device feed"),
        status_cell(dashboard.devices_status()),
        Cell::new(""),
    ]);
    table
}

pub fn build_devices_table(devices: &[Device], now: DateTime<Utc>) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Device", "Last seen", "Status"]);
    for device in devices {
        let (status, color) = if device.is_active(now) {
            ("● ACTIVE", Color::Green)
        } else {
            ("○ INACTIVE", Color::DarkGrey)
        };
        table.add_row(vec![
            Cell::new(&device.device_id).add_attribute(Attribute::Bold),
            Cell::new(device.last_seen_at().map_or_else(|| "never".to_owned(), format_local_time)),
            Cell::new(status).fg(color),
        ]);
    }
    table
}

pub fn build_history_table(history: &BillingHistory) -> Table {
    let mut table = new_table();
    table.set_header(vec!["From", "To", "Start", "End", "Units", "Amount"]);
    for record in history {
        table.add_row(vec![
            Cell::new(record.from.with_timezone(&Local).format("%Y-%m-%d %H:%M"))
                .add_attribute(Attribute::Dim),
            Cell::new(record.to.with_timezone(&Local).format("%Y-%m-%d %H:%M")),
            Cell::new(format!("{:.2}", record.energy_start)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", record.energy_end)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", record.units)).set_alignment(CellAlignment::Right),
            Cell::new(record.amount).set_alignment(CellAlignment::Right).fg(
                if record.amount > Cost::ZERO { Color::Reset } else { Color::DarkGrey },
            ),
        ]);
    }
    table
}

/// Render the calendar cells as a Sunday-first week grid.
pub fn build_calendar_table(month: Month, cells: &[CalendarCell]) -> Table {
    let mut table = new_table();
    table.set_header(vec![Cell::new(month).add_attribute(Attribute::Bold)]);
    table.add_row(WEEKDAYS.map(|weekday| Cell::new(weekday).add_attribute(Attribute::Dim)));
    for week in &cells.iter().chunks(WEEKDAYS.len()) {
        let mut row = week.map(build_calendar_cell).collect_vec();
        row.resize_with(WEEKDAYS.len(), || Cell::new(""));
        table.add_row(row);
    }
    table
}

fn build_calendar_cell(cell: &CalendarCell) -> Cell {
    let CalendarCell::Day(day) = cell else {
        return Cell::new("");
    };
    let day_of_month = day.date.format("%e").to_string();
    match day.marker() {
        DayMarker::Empty => Cell::new(day_of_month),
        DayMarker::Checkmark => Cell::new(format!("{day_of_month}\n✓")).fg(Color::Green),
        DayMarker::Amount(amount) => {
            Cell::new(format!("{day_of_month}\n{amount:.0}")).fg(Color::Green)
        }
    }
}

pub fn build_tariff_table(breakdown: &[SlabCharge]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Slab", "Rate", "Units", "Charge"]);
    for charge in breakdown {
        let slab = match charge.slab.upper {
            Some(upper) => format!("{:.0}…{:.0}", charge.slab.lower.0, upper.0),
            None => format!("{:.0}+", charge.slab.lower.0),
        };
        table.add_row(vec![
            Cell::new(slab),
            Cell::new(charge.slab.rate).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", charge.units)).set_alignment(CellAlignment::Right),
            Cell::new(charge.cost).set_alignment(CellAlignment::Right),
        ]);
    }
    let total = breakdown.iter().map(|charge| charge.cost).sum::<Cost>();
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(total).set_alignment(CellAlignment::Right).add_attribute(Attribute::Bold),
    ]);
    table
}
