//! The calendar date dimension.

use chrono::{Datelike, NaiveDate};
use diesel::prelude::*;

/// One `dim_dates` row: a calendar day with its decomposed fields.
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = crate::schema::dim_dates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DateRow {
    pub date_id: NaiveDate,
    pub day: i32,
    pub month: i32,
    pub year: i32,
    pub weekday: String,
}

/// Materialize one row per calendar day in `[start, end]`, inclusive.
/// Deterministic: the same range always yields the same rows.
pub fn date_rows(start: NaiveDate, end: NaiveDate) -> Vec<DateRow> {
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| DateRow {
            date_id: date,
            day: date.day() as i32,
            month: date.month() as i32,
            year: date.year(),
            weekday: date.format("%A").to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn three_day_range_produces_exactly_three_rows() {
        let rows = date_rows(ymd(2015, 1, 1), ymd(2015, 1, 3));
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            DateRow {
                date_id: ymd(2015, 1, 1),
                day: 1,
                month: 1,
                year: 2015,
                weekday: "Thursday".into(),
            }
        );
        assert_eq!(rows[1].weekday, "Friday");
        assert_eq!(rows[2].weekday, "Saturday");
        assert_eq!(rows[2].date_id, ymd(2015, 1, 3));
    }

    #[test]
    fn single_day_range_is_one_row() {
        let rows = date_rows(ymd(2015, 6, 15), ymd(2015, 6, 15));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].weekday, "Monday");
    }

    #[test]
    fn full_year_covers_every_day() {
        let rows = date_rows(ymd(2015, 1, 1), ymd(2015, 12, 31));
        assert_eq!(rows.len(), 365);
        assert!(rows.iter().all(|r| r.year == 2015));
    }

    #[test]
    fn inverted_range_is_empty() {
        assert!(date_rows(ymd(2015, 1, 2), ymd(2015, 1, 1)).is_empty());
    }
}
