use anyhow::{Context, Result, ensure};
use chrono::NaiveDate;
use diesel::prelude::*;
use tracing::info;

use crate::dates::date_rows;
use crate::schema::dim_dates;

/// Generate and insert the date dimension for `[start, end]` in one
/// batch insert.
pub fn insert_dates(conn: &mut PgConnection, start: NaiveDate, end: NaiveDate) -> Result<usize> {
    ensure!(start <= end, "date range start {start} is after end {end}");

    let rows = date_rows(start, end);
    let inserted = diesel::insert_into(dim_dates::table)
        .values(&rows)
        .execute(conn)
        .with_context(|| format!("inserting dim_dates for {start}..={end}"))?;
    info!("inserted {inserted} rows into dim_dates ({start} to {end})");
    Ok(inserted)
}
