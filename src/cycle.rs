// Ministry rotation resolver for the parish cycle of prayers.
//
// The rotation sheet lists one week per dated label with a handful of
// ministries each; the cycle simply repeats year after year. Given a
// target Sunday we count weeks from the cycle's anchor date and index
// modulo the regular cycle length. Weeks holding a single "special"
// entry sit outside the regular rotation.

use chrono::NaiveDate;

const CYCLE_DATE_FORMATS: [&str; 3] = ["%B %d, %Y", "%m/%d/%Y", "%Y-%m-%d"];

// Used when no week label parses as a date; matches the rotation sheet's
// first recorded week.
const FALLBACK_ANCHOR: (i32, u32, u32) = (2022, 8, 28);

/// One week of the rotation: its sheet date label and assigned ministries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleWeek {
    pub date_label: String,
    pub ministries: Vec<String>,
}

fn parse_cycle_date(date_str: &str) -> Option<NaiveDate> {
    let date_str = date_str.trim();
    if date_str.is_empty() {
        return None;
    }
    CYCLE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_str, fmt).ok())
}

fn is_special_week(week: &CycleWeek) -> bool {
    week.ministries.len() == 1 && week.ministries[0].to_lowercase().contains("special")
}

/// Ministries for a given Sunday. Returns None when the rotation holds no
/// regular weeks. Dates before the anchor still resolve; the cycle is
/// treated as extending in both directions.
pub fn ministries_for_date(cycle: &[CycleWeek], target: NaiveDate) -> Option<Vec<String>> {
    let regular_weeks: Vec<&CycleWeek> = cycle.iter().filter(|w| !is_special_week(w)).collect();
    if regular_weeks.is_empty() {
        return None;
    }

    let anchor = cycle
        .first()
        .and_then(|w| parse_cycle_date(&w.date_label))
        .unwrap_or_else(|| {
            let (y, m, d) = FALLBACK_ANCHOR;
            NaiveDate::from_ymd_opt(y, m, d).unwrap()
        });

    let days_diff = (target - anchor).num_days();
    let week_offset = days_diff.div_euclid(7);
    let cycle_pos = week_offset.rem_euclid(regular_weeks.len() as i64) as usize;

    Some(regular_weeks[cycle_pos].ministries.clone())
}

/// Join ministries for insertion into the intercessions:
/// "A", "A and B", or "A, B, and C".
pub fn format_ministries(ministries: &[String]) -> String {
    match ministries {
        [] => String::new(),
        [one] => one.clone(),
        [first, second] => format!("{} and {}", first, second),
        [head @ .., last] => format!("{}, and {}", head.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(label: &str, ministries: &[&str]) -> CycleWeek {
        CycleWeek {
            date_label: label.to_string(),
            ministries: ministries.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn sample_cycle() -> Vec<CycleWeek> {
        vec![
            week("August 28, 2022", &["Altar Guild", "Belize Mission Team", "Bible Builders"]),
            week("September 4, 2022", &["Choir", "Communications", "Daughters of the King"]),
            week("", &["Special Prayers Week"]),
            week("September 11, 2022", &["Flower Guild", "Greeters", "Junior Daughters"]),
        ]
    }

    #[test]
    fn test_week_positioning() {
        let cycle = sample_cycle();
        let anchor = NaiveDate::from_ymd_opt(2022, 8, 28).unwrap();
        assert_eq!(
            ministries_for_date(&cycle, anchor).unwrap()[0],
            "Altar Guild"
        );
        assert_eq!(
            ministries_for_date(&cycle, anchor + chrono::Duration::days(7)).unwrap()[0],
            "Choir"
        );
        // The special week is not part of the rotation: week 2 is the
        // third regular week, and week 3 wraps around
        assert_eq!(
            ministries_for_date(&cycle, anchor + chrono::Duration::days(14)).unwrap()[0],
            "Flower Guild"
        );
        assert_eq!(
            ministries_for_date(&cycle, anchor + chrono::Duration::days(21)).unwrap()[0],
            "Altar Guild"
        );
    }

    #[test]
    fn test_dates_before_anchor_wrap() {
        let cycle = sample_cycle();
        let before = NaiveDate::from_ymd_opt(2022, 8, 21).unwrap();
        // One week before the anchor lands on the last regular week
        assert_eq!(ministries_for_date(&cycle, before).unwrap()[0], "Flower Guild");
    }

    #[test]
    fn test_no_regular_weeks() {
        let cycle = vec![week("", &["Special Prayers Week"])];
        assert!(ministries_for_date(&cycle, NaiveDate::from_ymd_opt(2026, 1, 4).unwrap()).is_none());
    }

    #[test]
    fn test_format_ministries() {
        let m = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(format_ministries(&m(&[])), "");
        assert_eq!(format_ministries(&m(&["Altar Guild"])), "Altar Guild");
        assert_eq!(format_ministries(&m(&["A", "B"])), "A and B");
        assert_eq!(format_ministries(&m(&["A", "B", "C"])), "A, B, and C");
    }
}
