//! Bulk loaders for the three reference dimensions.
//!
//! The airline, airport, and cancellation-code CSVs are assumed clean, so
//! they go straight into their tables over the PostgreSQL COPY protocol
//! with no row-level validation. Empty strings become NULL.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use diesel::pg::CopyFormat;
use diesel::prelude::*;
use tracing::info;

use crate::schema::{dim_airlines, dim_airports, dim_cancellation_codes};

/// Read a CSV file and drop its header line; COPY's CSV options here do
/// not skip headers for us.
fn csv_body(path: &Path) -> Result<Vec<u8>> {
    let contents = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let body_start = contents
        .iter()
        .position(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(contents.len());
    Ok(contents[body_start..].to_vec())
}

pub fn copy_airlines(conn: &mut PgConnection, path: &Path) -> Result<usize> {
    let body = csv_body(path)?;
    let rows = diesel::copy_from(dim_airlines::table)
        .from_raw_data(dim_airlines::table, |copy| {
            copy.write_all(&body)
                .map_err(|e| diesel::result::Error::SerializationError(Box::new(e)))
        })
        .with_format(CopyFormat::Csv)
        .with_null("")
        .execute(conn)
        .with_context(|| format!("COPY dim_airlines FROM {}", path.display()))?;
    info!("copied {rows} rows into dim_airlines");
    Ok(rows)
}

pub fn copy_airports(conn: &mut PgConnection, path: &Path) -> Result<usize> {
    let body = csv_body(path)?;
    let rows = diesel::copy_from(dim_airports::table)
        .from_raw_data(dim_airports::table, |copy| {
            copy.write_all(&body)
                .map_err(|e| diesel::result::Error::SerializationError(Box::new(e)))
        })
        .with_format(CopyFormat::Csv)
        .with_null("")
        .execute(conn)
        .with_context(|| format!("COPY dim_airports FROM {}", path.display()))?;
    info!("copied {rows} rows into dim_airports");
    Ok(rows)
}

pub fn copy_cancellation_codes(conn: &mut PgConnection, path: &Path) -> Result<usize> {
    let body = csv_body(path)?;
    let rows = diesel::copy_from(dim_cancellation_codes::table)
        .from_raw_data(dim_cancellation_codes::table, |copy| {
            copy.write_all(&body)
                .map_err(|e| diesel::result::Error::SerializationError(Box::new(e)))
        })
        .with_format(CopyFormat::Csv)
        .with_null("")
        .execute(conn)
        .with_context(|| format!("COPY dim_cancellation_codes FROM {}", path.display()))?;
    info!("copied {rows} rows into dim_cancellation_codes");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    #[test]
    fn csv_body_strips_header_only() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "IATA_CODE,AIRLINE\nUA,United Air Lines Inc.\nAA,American Airlines Inc.\n")
            .unwrap();
        let body = csv_body(file.path()).unwrap();
        assert_eq!(
            body,
            b"UA,United Air Lines Inc.\nAA,American Airlines Inc.\n"
        );
    }

    #[test]
    fn csv_body_of_header_only_file_is_empty() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "IATA_CODE,AIRLINE\n").unwrap();
        assert!(csv_body(file.path()).unwrap().is_empty());
    }
}
