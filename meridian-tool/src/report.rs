//! Plain-text output for the one-shot commands.

use std::fmt::Write;

use meridian_core::{Board, Timezone, WindowError};

const CELL_WIDTH: usize = 4;

fn zone_header(zone: &Timezone) -> String {
    format!(
        "{:<28} {:<6} {:>9}  {} {} {}  ({})",
        zone.name,
        zone.abbr,
        zone.clock,
        zone.day_of_week,
        zone.month_and_day,
        zone.year,
        zone.diff_hours_from_home
    )
}

/// Two text lines of dial labels for a zone.
pub fn dial_lines(zone: &Timezone) -> (String, String) {
    let mut upper = String::new();
    let mut lower = String::new();

    for label in zone.dials.labels() {
        let (top, bottom) = label.lines();
        let _ = write!(upper, "{:^width$}", top, width = CELL_WIDTH);
        let _ = write!(lower, "{:^width$}", bottom, width = CELL_WIDTH);
    }

    (upper.trim_end().to_string(), lower.trim_end().to_string())
}

/// Every zone on the board with its dial row.
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();

    for zone in board.zones() {
        let (upper, lower) = dial_lines(zone);
        let _ = writeln!(out, "{}", zone_header(zone));
        let _ = writeln!(out, "  {}", upper);
        if !lower.is_empty() {
            let _ = writeln!(out, "  {}", lower);
        }
    }

    out
}

pub fn render_search(results: &[&Timezone]) -> String {
    let mut out = String::new();
    for zone in results {
        let _ = writeln!(
            out,
            "{:<32} {:<6} {:>9}  {}",
            zone.name, zone.abbr, zone.clock, zone.value
        );
    }
    out
}

/// Start and end of the board's window in every zone.
pub fn render_meeting_times(board: &Board) -> Result<String, WindowError> {
    let mut out = String::new();
    let width = board
        .zones()
        .iter()
        .map(|z| z.name.len())
        .max()
        .unwrap_or(0);

    for (zone, times) in board.meeting_times()? {
        let _ = writeln!(
            out,
            "{:<width$}  {} ({}) - {} ({})",
            zone.name,
            times.start.time_label(),
            times.start.date_label(),
            times.end.time_label(),
            times.end.date_label(),
            width = width
        );
    }

    Ok(out)
}
