use thiserror::Error;

/// Failure taxonomy for the fact load.
///
/// Unparsable time fields never surface here; they are downgraded to NULL
/// and reported through [`crate::events::LoadEvent::TimeFieldNulled`].
/// Everything below aborts the run.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A row whose fields cannot be assembled into a fact row, such as an
    /// invalid year/month/day combination.
    #[error("row {line}: {reason}")]
    BadRow { line: u64, reason: String },

    /// The database rejected an individual insert (foreign-key or check
    /// constraint violation, type coercion failure).
    #[error("row {line}: insert rejected: {source}")]
    RowRejected {
        line: u64,
        #[source]
        source: diesel::result::Error,
    },

    #[error("reading flights CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}
