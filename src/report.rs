//! The denormalized reporting view.
//!
//! One flat row per flight whose airline and both airports resolve in the
//! dimensions (inner joins); the cancellation description is left-joined
//! so uncancelled flights still appear with a NULL description.

use anyhow::{Context, Result};
use diesel::PgConnection;
use diesel::connection::SimpleConnection;
use tracing::info;

pub const REPORT_VIEW_SQL: &str = "
    CREATE VIEW flight_report AS
    SELECT
        f.id,
        f.date_id AS flight_date,
        d.weekday,
        al.iata_code AS airline_code,
        al.airline AS airline_name,
        f.flight_number,
        f.tail_number,
        org.iata_code AS origin_code,
        org.airport AS origin_airport,
        org.city AS origin_city,
        dst.iata_code AS destination_code,
        dst.airport AS destination_airport,
        dst.city AS destination_city,
        f.scheduled_departure,
        f.departure_time,
        f.departure_delay,
        f.scheduled_arrival,
        f.arrival_time,
        f.arrival_delay,
        f.overall_delay,
        f.distance,
        f.diverted,
        f.cancelled,
        cc.cancellation_description
    FROM fact_flights f
    JOIN dim_dates d ON f.date_id = d.date_id
    JOIN dim_airlines al ON f.airline_id = al.iata_code
    JOIN dim_airports org ON f.origin_airport = org.iata_code
    JOIN dim_airports dst ON f.dest_airport = dst.iata_code
    LEFT JOIN dim_cancellation_codes cc
        ON f.cancellation_code = cc.cancellation_reason
";

/// Drop and rebuild the `flight_report` view.
pub fn build_report_view(conn: &mut PgConnection) -> Result<()> {
    conn.batch_execute("DROP VIEW IF EXISTS flight_report")
        .context("dropping flight_report")?;
    conn.batch_execute(REPORT_VIEW_SQL)
        .context("creating flight_report")?;
    info!("built flight_report view");
    Ok(())
}
