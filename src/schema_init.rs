//! Drop-and-recreate DDL for the star schema.
//!
//! The dataset is rebuilt from scratch on every load, so there are no
//! migrations here: each statement drops its target first and the whole
//! sequence is idempotent. Dimension tables are created before the fact
//! table that references them, and drops run in the reverse order.

use anyhow::{Context, Result};
use diesel::PgConnection;
use diesel::connection::SimpleConnection;
use tracing::info;

pub const DROP_STATEMENTS: &[&str] = &[
    "DROP VIEW IF EXISTS flight_report",
    "DROP TABLE IF EXISTS fact_flights",
    "DROP TABLE IF EXISTS dim_dates",
    "DROP TABLE IF EXISTS dim_cancellation_codes",
    "DROP TABLE IF EXISTS dim_airports",
    "DROP TABLE IF EXISTS dim_airlines",
];

pub const CREATE_STATEMENTS: &[&str] = &[
    "CREATE TABLE dim_airlines (
        iata_code VARCHAR(5) PRIMARY KEY,
        airline VARCHAR(100) NOT NULL
    )",
    "CREATE TABLE dim_airports (
        iata_code VARCHAR(5) PRIMARY KEY,
        airport VARCHAR(100) NOT NULL,
        city VARCHAR(50) NOT NULL,
        state VARCHAR(50) NOT NULL,
        country VARCHAR(50) NOT NULL,
        latitude REAL,
        longitude REAL
    )",
    "CREATE TABLE dim_cancellation_codes (
        cancellation_reason CHAR(1) PRIMARY KEY
            CHECK (cancellation_reason IN ('A', 'B', 'C', 'D')),
        cancellation_description VARCHAR(50) NOT NULL
    )",
    "CREATE TABLE dim_dates (
        date_id DATE PRIMARY KEY,
        day INT NOT NULL,
        month INT NOT NULL,
        year INT NOT NULL,
        weekday TEXT NOT NULL
    )",
    "CREATE TABLE fact_flights (
        id SERIAL PRIMARY KEY,
        date_id DATE NOT NULL REFERENCES dim_dates (date_id),
        airline_id VARCHAR(5) REFERENCES dim_airlines (iata_code),
        flight_number TEXT,
        tail_number TEXT,
        origin_airport VARCHAR(5) REFERENCES dim_airports (iata_code),
        dest_airport VARCHAR(5) REFERENCES dim_airports (iata_code),
        scheduled_departure TIME,
        departure_time TIME,
        departure_delay INTEGER,
        scheduled_time INTEGER,
        elapsed_time INTEGER,
        air_time INTEGER,
        distance REAL,
        scheduled_arrival TIME,
        arrival_time TIME,
        arrival_delay INTEGER,
        overall_delay INTEGER,
        diverted BOOLEAN,
        cancelled BOOLEAN,
        cancellation_code CHAR(1) REFERENCES dim_cancellation_codes (cancellation_reason),
        air_system_delay REAL,
        security_delay REAL,
        airline_delay REAL,
        late_aircraft_delay REAL,
        weather_delay REAL
    )",
];

/// Drop every target table (and the reporting view) if present, then
/// recreate the schema. Any SQL error aborts; no partial-schema recovery.
pub fn init_schema(conn: &mut PgConnection) -> Result<()> {
    for sql in DROP_STATEMENTS {
        conn.batch_execute(sql)
            .with_context(|| format!("executing: {sql}"))?;
    }
    for sql in CREATE_STATEMENTS {
        conn.batch_execute(sql)
            .with_context(|| format!("executing: {sql}"))?;
    }
    info!("schema initialized ({} tables)", CREATE_STATEMENTS.len());
    Ok(())
}
