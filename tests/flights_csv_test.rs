use std::io::Write;

use chrono::{NaiveDate, NaiveTime};
use tempfile::NamedTempFile;

use flightmart::flights::{CleanedFlight, RawFlight, clean_flight};

const HEADER: &str = "YEAR,MONTH,DAY,DAY_OF_WEEK,AIRLINE,FLIGHT_NUMBER,TAIL_NUMBER,\
ORIGIN_AIRPORT,DESTINATION_AIRPORT,SCHEDULED_DEPARTURE,DEPARTURE_TIME,DEPARTURE_DELAY,\
TAXI_OUT,WHEELS_OFF,SCHEDULED_TIME,ELAPSED_TIME,AIR_TIME,DISTANCE,WHEELS_ON,TAXI_IN,\
SCHEDULED_ARRIVAL,ARRIVAL_TIME,ARRIVAL_DELAY,DIVERTED,CANCELLED,CANCELLATION_REASON,\
AIR_SYSTEM_DELAY,SECURITY_DELAY,AIRLINE_DELAY,LATE_AIRCRAFT_DELAY,WEATHER_DELAY";

fn clean_file(contents: &str) -> Vec<CleanedFlight> {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();

    let mut reader = csv::Reader::from_path(file.path()).unwrap();
    reader
        .deserialize::<RawFlight>()
        .enumerate()
        .map(|(i, record)| clean_flight(&record.unwrap(), i as u64 + 2).unwrap())
        .collect()
}

#[test]
fn two_row_flights_file_cleans_end_to_end() {
    let contents = format!(
        "{HEADER}\n\
         2015,1,1,4,AS,98,N407AS,ANC,SEA,5,2354,-11,21,15,205,194,169,1448,404,4,430,408,-22,0,0,,,,,,\n\
         2015,1,1,4,AA,2336,N3KUAA,LAX,PBI,10,12,,16,28,280,279,263,2330,741,4,750,745,15,0,0,,,,,,\n"
    );
    let rows = clean_file(&contents);
    assert_eq!(rows.len(), 2);

    let first = &rows[0].fact;
    assert_eq!(first.date_id, NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
    assert_eq!(first.airline_id.as_deref(), Some("AS"));
    assert_eq!(first.origin_airport.as_deref(), Some("ANC"));
    assert_eq!(first.dest_airport.as_deref(), Some("SEA"));
    assert_eq!(first.scheduled_departure, NaiveTime::from_hms_opt(0, 5, 0));
    assert_eq!(first.departure_time, NaiveTime::from_hms_opt(23, 54, 0));
    assert_eq!(first.overall_delay, Some(-33));
    assert_eq!(first.diverted, Some(false));
    assert_eq!(first.cancelled, Some(false));
    assert_eq!(first.cancellation_code, None);

    // Second row: departure delay absent, arrival delay 15. The aggregate
    // treats the missing delay as zero while the field itself stays NULL.
    let second = &rows[1].fact;
    assert_eq!(second.departure_delay, None);
    assert_eq!(second.arrival_delay, Some(15));
    assert_eq!(second.overall_delay, Some(15));
}

#[test]
fn cancelled_flight_with_na_times_nulls_them() {
    let contents = format!(
        "{HEADER}\n\
         2015,2,14,6,MQ,3322,,ORD,DSM,1350,NA,NA,NA,NA,65,NA,NA,299,NA,NA,1455,NA,NA,0,1,B,,,,,\n"
    );
    let rows = clean_file(&contents);
    assert_eq!(rows.len(), 1);

    let fact = &rows[0].fact;
    assert_eq!(fact.date_id, NaiveDate::from_ymd_opt(2015, 2, 14).unwrap());
    assert_eq!(fact.tail_number, None);
    assert_eq!(fact.scheduled_departure, NaiveTime::from_hms_opt(13, 50, 0));
    assert_eq!(fact.departure_time, None);
    assert_eq!(fact.arrival_time, None);
    assert_eq!(fact.departure_delay, None);
    assert_eq!(fact.overall_delay, Some(0));
    assert_eq!(fact.cancelled, Some(true));
    assert_eq!(fact.cancellation_code.as_deref(), Some("B"));
    // "NA" is a missing value, not a parse failure
    assert!(rows[0].nulled_times.is_empty());
}

#[test]
fn garbage_time_is_reported_not_fatal() {
    let contents = format!(
        "{HEADER}\n\
         2015,3,1,7,DL,806,N3730B,SFO,MSP,800,2460,5,11,815,215,210,190,1589,1330,9,1335,1340,5,0,0,,,,,,\n"
    );
    let rows = clean_file(&contents);
    assert_eq!(rows[0].fact.departure_time, None);
    assert_eq!(rows[0].nulled_times.len(), 1);
    assert_eq!(rows[0].nulled_times[0].column, "DEPARTURE_TIME");
    assert_eq!(rows[0].nulled_times[0].raw, "2460");
}
