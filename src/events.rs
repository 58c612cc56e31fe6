//! Structured load events, decoupling progress/error reporting from the
//! loader itself. The CLI renders them through `tracing`.

use tracing::{debug, error, info, warn};

/// After this many nulled-field warnings, further occurrences drop to
/// debug so a systematically dirty column cannot flood the log.
const NULLED_WARN_SAMPLE: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    /// A batch of fact rows finished loading. Whether that coincides
    /// with a commit depends on the configured commit granularity.
    BatchCompleted {
        batch: usize,
        rows: usize,
        total_rows: usize,
    },
    /// A time column carried a value that did not parse as HHMM and was
    /// stored as NULL.
    TimeFieldNulled {
        line: u64,
        column: &'static str,
        raw: String,
    },
    /// A row failed fatally; the run aborts after this event.
    RowFailed {
        line: u64,
        row: String,
        error: String,
    },
}

pub trait LoadObserver {
    fn on_event(&mut self, event: &LoadEvent);
}

/// Default observer: renders load events as log lines, warning on the
/// first few nulled fields and demoting the rest to debug.
#[derive(Debug, Default)]
pub struct TracingObserver {
    nulled_seen: usize,
}

impl LoadObserver for TracingObserver {
    fn on_event(&mut self, event: &LoadEvent) {
        match event {
            LoadEvent::BatchCompleted {
                batch,
                rows,
                total_rows,
            } => info!("batch {batch} complete: inserted {rows} records ({total_rows} total)"),
            LoadEvent::TimeFieldNulled { line, column, raw } => {
                self.nulled_seen += 1;
                if self.nulled_seen <= NULLED_WARN_SAMPLE {
                    warn!(
                        "row {line}: {column} value '{raw}' is not a valid HHMM time, stored NULL"
                    );
                } else {
                    debug!(
                        "row {line}: {column} value '{raw}' is not a valid HHMM time, stored NULL"
                    );
                }
            }
            LoadEvent::RowFailed { line, row, error } => {
                error!("insert failed on row {line}: {error}; offending row: {row}")
            }
        }
    }
}
