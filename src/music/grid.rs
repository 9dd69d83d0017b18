// Extractor for the music-planning spreadsheet's "table of tables" layout.
//
// The export is one rectangular grid of string cells holding up to nine
// independent panels: three horizontal positions, repeated down the sheet,
// each panel anchored by a marker cell. Panel layout:
//
//   Row 0:  "Service Planner: This Week" | "" | "Date:" | "2026-02-15"
//   Row 1:  "Service Part" | "Song (9 am) - Lent 1A" | "Key" | "Lead"
//   Row 2+: "Processional:" | "Build My Life" | "G" | "Steph"
//
// A malformed panel is dropped on its own; the rest of the grid still
// extracts.

use super::{MusicPlan, MusicSlot};
use chrono::NaiveDate;
use log::warn;

/// Marker prefix anchoring each panel.
pub const PLANNER_MARKER: &str = "Service Planner:";

// The three horizontal panel positions, and the fixed offsets within one
// panel: the date cell on the marker row, and the bound on data rows.
const PANEL_COLUMN_OFFSETS: [usize; 3] = [0, 5, 10];
const DATE_COLUMN_OFFSET: usize = 3;
const MAX_DATA_ROWS: usize = 18;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];

fn cell(rows: &[Vec<String>], row: usize, col: usize) -> &str {
    rows.get(row)
        .and_then(|r| r.get(col))
        .map(|s| s.trim())
        .unwrap_or("")
}

fn parse_panel_date(date_str: &str) -> Option<NaiveDate> {
    let date_str = date_str.trim();
    if date_str.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_str, fmt).ok())
}

/// Extract every valid per-date plan from the grid.
pub fn extract_plans(rows: &[Vec<String>]) -> Vec<MusicPlan> {
    let mut plans = Vec::new();

    for (row_idx, row) in rows.iter().enumerate() {
        for col_offset in PANEL_COLUMN_OFFSETS {
            let Some(anchor) = row.get(col_offset) else {
                continue;
            };
            if !anchor.trim().starts_with(PLANNER_MARKER) {
                continue;
            }
            match parse_panel(rows, row_idx, col_offset) {
                Some(plan) => plans.push(plan),
                None => warn!(
                    "Discarding music panel at row {}, col {}: missing or unparseable date",
                    row_idx, col_offset
                ),
            }
        }
    }

    plans
}

/// Parse one panel anchored at (header_row, col_offset).
/// Returns None when the panel's date cell is missing or unparseable.
fn parse_panel(rows: &[Vec<String>], header_row: usize, col_offset: usize) -> Option<MusicPlan> {
    let date = parse_panel_date(cell(rows, header_row, col_offset + DATE_COLUMN_OFFSET))?;

    // Liturgical label sits in the column-header row, after a dash:
    // "Song (9 am) - Lent 1A"
    let label_cell = cell(rows, header_row + 1, col_offset + 1);
    let liturgical_label = label_cell
        .find('-')
        .map(|i| label_cell[i + 1..].trim().to_string())
        .unwrap_or_default();

    let mut slots = Vec::new();
    for i in (header_row + 2)..(header_row + 2 + MAX_DATA_ROWS).min(rows.len()) {
        let part = cell(rows, i, col_offset);
        let song = cell(rows, i, col_offset + 1);
        let key = cell(rows, i, col_offset + 2);
        let lead = cell(rows, i, col_offset + 3);

        // An empty part cell ends the panel's data
        if part.is_empty() {
            break;
        }

        // The column-header row can repeat inside a panel; skip it
        if part.to_lowercase().starts_with("service part") {
            continue;
        }

        if song.is_empty() {
            continue;
        }

        slots.push(MusicSlot {
            service_part: part.trim_end_matches(':').trim().to_string(),
            song_title: song.to_string(),
            key: key.to_string(),
            lead: lead.to_string(),
        });
    }

    Some(MusicPlan { date, liturgical_label, slots })
}

/// Convenience lookup: the plan for one target date, if present.
pub fn plan_for_date(rows: &[Vec<String>], target: NaiveDate) -> Option<MusicPlan> {
    extract_plans(rows).into_iter().find(|p| p.date == target)
}
