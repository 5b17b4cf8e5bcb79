//! Week-number to calendar mapping for the 2025 distribution calendar.
//!
//! The distribution table labels batches with a week number rather than a
//! date range. Week `w` begins on the Monday `anchor + (w - 1) * 7` days,
//! where the anchor is Monday 2024-12-30 (so week 3 starts on 2025-01-13).
//! Charts and tables only ever need the Monday, never full ranges.

use chrono::{NaiveDate, TimeDelta};

/// Monday beginning week 1 of the labeling scheme.
const WEEK1_MONDAY: NaiveDate = match NaiveDate::from_ymd_opt(2024, 12, 30) {
    Some(date) => date,
    None => panic!("invalid anchor date"),
};

/// Highest week number the scheme can address. Week cells outside
/// `1..=WEEKS_IN_SCHEME` cannot be placed on the axis and are skipped by
/// the aggregation.
pub const WEEKS_IN_SCHEME: u32 = 53;

/// Whether a parsed week number fits the labeling scheme.
pub fn in_scheme(week: u32) -> bool {
    (1..=WEEKS_IN_SCHEME).contains(&week)
}

/// Monday that begins week `week`.
pub fn monday_of_week(week: u32) -> NaiveDate {
    WEEK1_MONDAY
        .checked_add_signed(TimeDelta::weeks(i64::from(week) - 1))
        .unwrap_or(WEEK1_MONDAY)
}

/// Short day/month caption, e.g. `13/01` for week 3.
pub fn monday_label(week: u32) -> String {
    monday_of_week(week).format("%d/%m").to_string()
}

/// Long caption used by tables, e.g. `Sett. 3 (13/01)`.
pub fn long_label(week: u32) -> String {
    format!("Sett. {week} ({})", monday_label(week))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_one_starts_on_the_anchor_monday() {
        assert_eq!(
            monday_of_week(1),
            NaiveDate::from_ymd_opt(2024, 12, 30).unwrap()
        );
    }

    #[test]
    fn week_three_starts_on_january_13th() {
        assert_eq!(
            monday_of_week(3),
            NaiveDate::from_ymd_opt(2025, 1, 13).unwrap()
        );
        assert_eq!(monday_label(3), "13/01");
        assert_eq!(long_label(3), "Sett. 3 (13/01)");
    }

    #[test]
    fn consecutive_weeks_are_seven_days_apart() {
        for week in 1..WEEKS_IN_SCHEME {
            let gap = monday_of_week(week + 1) - monday_of_week(week);
            assert_eq!(gap, TimeDelta::days(7));
        }
    }

    #[test]
    fn scheme_bounds() {
        assert!(!in_scheme(0));
        assert!(in_scheme(1));
        assert!(in_scheme(53));
        assert!(!in_scheme(54));
    }
}
