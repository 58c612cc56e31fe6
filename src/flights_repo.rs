//! Batched loader for `fact_flights`.
//!
//! Rows are read from the flights CSV in fixed-size batches and inserted
//! one statement at a time; the first rejected row aborts the run. Commit
//! granularity is configurable: per row (the original durability-first
//! behavior), per batch (default), or one transaction for the whole run.

use std::path::Path;
use std::time::{Duration, Instant};

use clap::ValueEnum;
use csv::ReaderBuilder;
use diesel::prelude::*;
use tracing::info;

use crate::errors::LoadError;
use crate::events::{LoadEvent, LoadObserver};
use crate::flights::{NewFactFlight, RawFlight, clean_flight};
use crate::schema::fact_flights;

pub const DEFAULT_BATCH_SIZE: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CommitGranularity {
    /// Commit after every insert.
    Row,
    /// One transaction per batch.
    Batch,
    /// One transaction for the entire load.
    Run,
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub batch_size: usize,
    pub commit: CommitGranularity,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            commit: CommitGranularity::Batch,
        }
    }
}

#[derive(Debug, Default)]
pub struct LoadSummary {
    pub rows_inserted: usize,
    pub batches: usize,
    pub times_nulled: usize,
    pub elapsed: Duration,
}

struct PendingRow {
    line: u64,
    fact: NewFactFlight,
}

/// Stream the flights CSV into `fact_flights`.
pub fn load_flights(
    conn: &mut PgConnection,
    path: &Path,
    options: &LoadOptions,
    observer: &mut dyn LoadObserver,
) -> Result<LoadSummary, LoadError> {
    match options.commit {
        CommitGranularity::Run => {
            conn.transaction(|conn| stream_file(conn, path, options, observer, false))
        }
        CommitGranularity::Batch => stream_file(conn, path, options, observer, true),
        CommitGranularity::Row => stream_file(conn, path, options, observer, false),
    }
}

fn stream_file(
    conn: &mut PgConnection,
    path: &Path,
    options: &LoadOptions,
    observer: &mut dyn LoadObserver,
    transaction_per_batch: bool,
) -> Result<LoadSummary, LoadError> {
    let start = Instant::now();
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut summary = LoadSummary::default();
    let mut batch: Vec<PendingRow> = Vec::with_capacity(options.batch_size.min(DEFAULT_BATCH_SIZE));

    for (index, record) in reader.deserialize::<RawFlight>().enumerate() {
        // line 1 is the header
        let line = index as u64 + 2;
        let raw = record?;
        let cleaned = match clean_flight(&raw, line) {
            Ok(cleaned) => cleaned,
            Err(err) => {
                observer.on_event(&LoadEvent::RowFailed {
                    line,
                    row: format!("{raw:?}"),
                    error: err.to_string(),
                });
                return Err(err);
            }
        };

        for nulled in &cleaned.nulled_times {
            observer.on_event(&LoadEvent::TimeFieldNulled {
                line,
                column: nulled.column,
                raw: nulled.raw.clone(),
            });
        }
        summary.times_nulled += cleaned.nulled_times.len();

        batch.push(PendingRow {
            line,
            fact: cleaned.fact,
        });
        if batch.len() >= options.batch_size {
            flush(conn, &batch, transaction_per_batch, observer, &mut summary)?;
            batch.clear();
        }
    }
    if !batch.is_empty() {
        flush(conn, &batch, transaction_per_batch, observer, &mut summary)?;
    }

    summary.elapsed = start.elapsed();
    info!(
        "loaded {} fact rows in {} batches, {} time fields nulled, took {:.1?}",
        summary.rows_inserted, summary.batches, summary.times_nulled, summary.elapsed
    );
    Ok(summary)
}

fn flush(
    conn: &mut PgConnection,
    batch: &[PendingRow],
    in_transaction: bool,
    observer: &mut dyn LoadObserver,
    summary: &mut LoadSummary,
) -> Result<(), LoadError> {
    let inserted = if in_transaction {
        conn.transaction(|conn| insert_rows(conn, batch, observer))
    } else {
        insert_rows(conn, batch, observer)
    }?;

    summary.rows_inserted += inserted;
    summary.batches += 1;
    observer.on_event(&LoadEvent::BatchCompleted {
        batch: summary.batches,
        rows: inserted,
        total_rows: summary.rows_inserted,
    });
    Ok(())
}

fn insert_rows(
    conn: &mut PgConnection,
    batch: &[PendingRow],
    observer: &mut dyn LoadObserver,
) -> Result<usize, LoadError> {
    for row in batch {
        if let Err(source) = diesel::insert_into(fact_flights::table)
            .values(&row.fact)
            .execute(conn)
        {
            observer.on_event(&LoadEvent::RowFailed {
                line: row.line,
                row: format!("{:?}", row.fact),
                error: source.to_string(),
            });
            return Err(LoadError::RowRejected {
                line: row.line,
                source,
            });
        }
    }
    Ok(batch.len())
}
