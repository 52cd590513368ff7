use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::aggregation::format_duration;
use crate::model::JobStatus;

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

pub fn color_coded_duration_cell(seconds: u64) -> Cell {
    let text = format_duration(seconds);
    let minutes = seconds / 60;
    if minutes <= 10 {
        Cell::new(text).fg(TableColor::Green)
    } else if minutes <= 15 {
        Cell::new(text).fg(TableColor::Yellow)
    } else {
        Cell::new(text).fg(TableColor::Red)
    }
}

pub fn color_coded_status_cell(status: JobStatus) -> Cell {
    let color = match status {
        JobStatus::Success => TableColor::Green,
        JobStatus::Failed => TableColor::Red,
        JobStatus::Warning | JobStatus::Running => TableColor::Yellow,
        JobStatus::Scheduled | JobStatus::Manual | JobStatus::Skipped | JobStatus::Created => {
            TableColor::DarkGrey
        }
    };
    Cell::new(status).fg(color)
}

/// Renders a measured value with its unit.
///
/// Energy impacts are often tiny, so very small magnitudes switch to
/// scientific notation.
pub fn format_value(value: f64, unit: &str) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-3..1e6).contains(&magnitude) {
        format!("{value:.3e} {unit}")
    } else {
        format!("{value:.3} {unit}")
    }
}
