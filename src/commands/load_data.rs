use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use diesel::PgConnection;
use tracing::info;

use crate::dates_repo::insert_dates;
use crate::dimensions_repo::{copy_airlines, copy_airports, copy_cancellation_codes};
use crate::events::TracingObserver;
use crate::flights_repo::{LoadOptions, load_flights};

pub struct LoadDataArgs {
    pub airlines_path: Option<PathBuf>,
    pub airports_path: Option<PathBuf>,
    pub cancellation_codes_path: Option<PathBuf>,
    pub flights_path: Option<PathBuf>,
    pub dates_start: NaiveDate,
    pub dates_end: NaiveDate,
    pub skip_dates: bool,
    pub options: LoadOptions,
}

/// Load whichever inputs were supplied, dimensions before facts so the
/// fact table's foreign keys can resolve.
pub fn handle_load_data(conn: &mut PgConnection, args: LoadDataArgs) -> Result<()> {
    if let Some(path) = &args.airlines_path {
        info!("loading airlines from {}", path.display());
        copy_airlines(conn, path)?;
    } else {
        info!("skipping airlines - no path provided");
    }

    if let Some(path) = &args.airports_path {
        info!("loading airports from {}", path.display());
        copy_airports(conn, path)?;
    } else {
        info!("skipping airports - no path provided");
    }

    if let Some(path) = &args.cancellation_codes_path {
        info!("loading cancellation codes from {}", path.display());
        copy_cancellation_codes(conn, path)?;
    } else {
        info!("skipping cancellation codes - no path provided");
    }

    if args.skip_dates {
        info!("skipping date dimension");
    } else {
        info!(
            "generating date dimension {} to {}",
            args.dates_start, args.dates_end
        );
        insert_dates(conn, args.dates_start, args.dates_end)?;
    }

    if let Some(path) = &args.flights_path {
        info!(
            "loading flights from {} (batch size {}, commit per {:?})",
            path.display(),
            args.options.batch_size,
            args.options.commit
        );
        let mut observer = TracingObserver::default();
        let summary = load_flights(conn, path, &args.options, &mut observer)
            .with_context(|| format!("loading fact_flights from {}", path.display()))?;
        info!(
            "fact load complete: {} rows in {} batches, {} time fields nulled",
            summary.rows_inserted, summary.batches, summary.times_nulled
        );
    } else {
        info!("skipping flights - no path provided");
    }

    Ok(())
}
