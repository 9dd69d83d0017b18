// Schedule sheet adapter: raw cell rows into typed per-Sunday entries.
//
// The liturgical-schedule export carries title/description rows above the
// real header, and its column names drift between years ("Title" vs
// "Sunday/Commemoration Title", embedded newlines). The adapter finds the
// header row, normalizes the names, and maps each data row onto a
// ScheduleEntry; downstream resolution never sees row/column coordinates.

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const DATE_FORMATS: [&str; 3] = ["%m/%d/%Y", "%m/%d/%y", "%Y-%m-%d"];

/// One row of the liturgical schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub service_type: String,
    pub date: Option<NaiveDate>,
    /// e.g. "Third Sunday in Lent"
    pub title: String,
    /// e.g. "23" or "-"
    pub proper: String,
    /// e.g. "Green", "Violet", "White", "Red"
    pub color: String,
    /// "A", "B", or "C"
    pub eucharistic_prayer: String,
    /// e.g. "Incarnation", "Lent (1)", "Lord's Day"
    pub preface: String,
    /// e.g. "1 Corinthians 10:1-13"
    pub reading: String,
    /// e.g. "Psalm 63:1-8 responsively"
    pub psalm: String,
    /// e.g. "Luke 13:1-9"
    pub gospel: String,
    /// Prayers of the People form: "I", "II", "VI (w/ confession)"
    pub pop_form: String,
    pub special_blessing: String,
    /// "Almighty" or "Eternal God"
    pub closing_prayer: String,
    /// "1", "2", "3", or "4"
    pub dismissal: String,
    pub notes: String,
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('\n', " ")
}

fn parse_date(date_str: &str) -> Option<NaiveDate> {
    let date_str = date_str.trim();
    if date_str.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_str, fmt).ok())
}

/// First row containing a "Date" cell; everything above it is preamble.
fn header_row_index(rows: &[Vec<String>]) -> Option<usize> {
    rows.iter()
        .position(|row| row.iter().any(|c| normalize_key(c) == "date"))
}

/// Fetch a cell by column name, trying each alias in order. Rows shorter
/// than the header are treated as padded with empty cells.
fn field(headers: &[String], row: &[String], aliases: &[&str]) -> String {
    for alias in aliases {
        if let Some(idx) = headers.iter().position(|h| h == alias) {
            return row.get(idx).map(|s| s.trim().to_string()).unwrap_or_default();
        }
    }
    String::new()
}

/// Parse a full schedule export into entries.
///
/// Fails only when no header row can be found; individual rows always
/// yield an entry (blank fields stay blank, unparseable dates become
/// None).
pub fn parse_schedule(rows: &[Vec<String>]) -> Result<Vec<ScheduleEntry>> {
    let header_idx = header_row_index(rows)
        .ok_or_else(|| anyhow!("Could not find header row with 'Date' column"))?;

    let headers: Vec<String> = rows[header_idx].iter().map(|c| normalize_key(c)).collect();

    let entries = rows[header_idx + 1..]
        .iter()
        .map(|row| ScheduleEntry {
            service_type: field(&headers, row, &["service type"]),
            date: parse_date(&field(&headers, row, &["date"])),
            title: field(&headers, row, &["sunday/commemoration title", "title"]),
            proper: field(&headers, row, &["proper"]),
            color: field(&headers, row, &["color"]),
            eucharistic_prayer: field(&headers, row, &["eucharistic prayer"]),
            preface: field(&headers, row, &["preface"]),
            reading: field(&headers, row, &["reading"]),
            psalm: field(&headers, row, &["psalm"]),
            gospel: field(&headers, row, &["gospel"]),
            pop_form: field(&headers, row, &["pop"]),
            special_blessing: field(&headers, row, &["special blessing"]),
            closing_prayer: field(&headers, row, &["closing prayer"]),
            dismissal: field(&headers, row, &["dismissal"]),
            notes: field(&headers, row, &["notes"]),
        })
        .collect();

    Ok(entries)
}

/// The entry for one target date. Sunday services win over other service
/// types sharing the date (feast transfers, special services).
pub fn entry_for_date(entries: &[ScheduleEntry], target: NaiveDate) -> Option<&ScheduleEntry> {
    entries
        .iter()
        .find(|e| e.date == Some(target) && e.service_type.trim().to_lowercase() == "sunday")
        .or_else(|| entries.iter().find(|e| e.date == Some(target)))
}

impl ScheduleEntry {
    /// Spoken rubric for the psalm, chosen from the citation's free text.
    pub fn psalm_rubric(&self) -> &'static str {
        let psalm_field = self.psalm.to_lowercase();
        if psalm_field.contains("responsiv") {
            return "Read responsively by whole verse.";
        }
        if psalm_field.contains("antiphon") {
            return "";
        }
        "Read in unison."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_header_detection_skips_preamble() {
        let rows = vec![
            row(&["Liturgical Schedule 2026", ""]),
            row(&["", ""]),
            row(&["Service Type", "Date", "Title", "Color"]),
            row(&["Sunday", "3/8/2026", "Third Sunday in Lent", "Violet"]),
        ];
        let entries = parse_schedule(&rows).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Third Sunday in Lent");
        assert_eq!(entries[0].date, NaiveDate::from_ymd_opt(2026, 3, 8));
    }

    #[test]
    fn test_missing_header_is_an_error() {
        let rows = vec![row(&["nothing", "useful", "here"])];
        assert!(parse_schedule(&rows).is_err());
    }

    #[test]
    fn test_column_aliases_and_newlines() {
        let rows = vec![
            row(&["Date", "Sunday/Commemoration\nTitle", "Eucharistic Prayer"]),
            row(&["1/4/2026", "Second Sunday after Christmas Day", "B"]),
        ];
        let entries = parse_schedule(&rows).unwrap();
        assert_eq!(entries[0].title, "Second Sunday after Christmas Day");
        assert_eq!(entries[0].eucharistic_prayer, "B");
    }

    #[test]
    fn test_short_rows_pad_with_blanks() {
        let rows = vec![
            row(&["Date", "Title", "Color", "Notes"]),
            row(&["1/4/2026", "Epiphany"]),
        ];
        let entries = parse_schedule(&rows).unwrap();
        assert_eq!(entries[0].color, "");
        assert_eq!(entries[0].notes, "");
    }

    #[test]
    fn test_psalm_rubric() {
        let mut e = ScheduleEntry { psalm: "Psalm 63:1-8 responsively".into(), ..Default::default() };
        assert_eq!(e.psalm_rubric(), "Read responsively by whole verse.");
        e.psalm = "Psalm 23 antiphonally".into();
        assert_eq!(e.psalm_rubric(), "");
        e.psalm = "Psalm 100".into();
        assert_eq!(e.psalm_rubric(), "Read in unison.");
    }
}
