//! Flight fact rows: the raw 31-column flights CSV record and the
//! cleaning/coercion that turns one into an insertable fact.
//!
//! Source columns, in file order: YEAR, MONTH, DAY, DAY_OF_WEEK, AIRLINE,
//! FLIGHT_NUMBER, TAIL_NUMBER, ORIGIN_AIRPORT, DESTINATION_AIRPORT,
//! SCHEDULED_DEPARTURE, DEPARTURE_TIME, DEPARTURE_DELAY, TAXI_OUT,
//! WHEELS_OFF, SCHEDULED_TIME, ELAPSED_TIME, AIR_TIME, DISTANCE, WHEELS_ON,
//! TAXI_IN, SCHEDULED_ARRIVAL, ARRIVAL_TIME, ARRIVAL_DELAY, DIVERTED,
//! CANCELLED, CANCELLATION_REASON, AIR_SYSTEM_DELAY, SECURITY_DELAY,
//! AIRLINE_DELAY, LATE_AIRCRAFT_DELAY, WEATHER_DELAY.
//!
//! Fields are mapped by header name, so the taxi/wheels columns and
//! DAY_OF_WEEK (none of which land in the fact table) are not modeled here.
//! Missing values appear as empty strings or the literal "NA"; both
//! normalize to NULL in every typed field.

use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;
use serde::{Deserialize, Deserializer};

use crate::errors::LoadError;

/// One row of the flights CSV, deserialized with minimal coercion.
///
/// The four HHMM time columns stay raw strings: a non-numeric time must
/// downgrade to a NULL field (see [`parse_hhmm`]), not fail the row.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFlight {
    #[serde(rename = "YEAR", default, deserialize_with = "de_opt_i32")]
    pub year: Option<i32>,
    #[serde(rename = "MONTH", default, deserialize_with = "de_opt_i32")]
    pub month: Option<i32>,
    #[serde(rename = "DAY", default, deserialize_with = "de_opt_i32")]
    pub day: Option<i32>,
    #[serde(rename = "AIRLINE", default, deserialize_with = "de_opt_string")]
    pub airline: Option<String>,
    #[serde(rename = "FLIGHT_NUMBER", default, deserialize_with = "de_opt_string")]
    pub flight_number: Option<String>,
    #[serde(rename = "TAIL_NUMBER", default, deserialize_with = "de_opt_string")]
    pub tail_number: Option<String>,
    #[serde(rename = "ORIGIN_AIRPORT", default, deserialize_with = "de_opt_string")]
    pub origin_airport: Option<String>,
    #[serde(rename = "DESTINATION_AIRPORT", default, deserialize_with = "de_opt_string")]
    pub destination_airport: Option<String>,
    #[serde(rename = "SCHEDULED_DEPARTURE", default, deserialize_with = "de_opt_string")]
    pub scheduled_departure: Option<String>,
    #[serde(rename = "DEPARTURE_TIME", default, deserialize_with = "de_opt_string")]
    pub departure_time: Option<String>,
    #[serde(rename = "DEPARTURE_DELAY", default, deserialize_with = "de_opt_i32")]
    pub departure_delay: Option<i32>,
    #[serde(rename = "SCHEDULED_TIME", default, deserialize_with = "de_opt_i32")]
    pub scheduled_time: Option<i32>,
    #[serde(rename = "ELAPSED_TIME", default, deserialize_with = "de_opt_i32")]
    pub elapsed_time: Option<i32>,
    #[serde(rename = "AIR_TIME", default, deserialize_with = "de_opt_i32")]
    pub air_time: Option<i32>,
    #[serde(rename = "DISTANCE", default, deserialize_with = "de_opt_f32")]
    pub distance: Option<f32>,
    #[serde(rename = "SCHEDULED_ARRIVAL", default, deserialize_with = "de_opt_string")]
    pub scheduled_arrival: Option<String>,
    #[serde(rename = "ARRIVAL_TIME", default, deserialize_with = "de_opt_string")]
    pub arrival_time: Option<String>,
    #[serde(rename = "ARRIVAL_DELAY", default, deserialize_with = "de_opt_i32")]
    pub arrival_delay: Option<i32>,
    #[serde(rename = "DIVERTED", default, deserialize_with = "de_opt_bool")]
    pub diverted: Option<bool>,
    #[serde(rename = "CANCELLED", default, deserialize_with = "de_opt_bool")]
    pub cancelled: Option<bool>,
    #[serde(rename = "CANCELLATION_REASON", default, deserialize_with = "de_opt_string")]
    pub cancellation_reason: Option<String>,
    #[serde(rename = "AIR_SYSTEM_DELAY", default, deserialize_with = "de_opt_f32")]
    pub air_system_delay: Option<f32>,
    #[serde(rename = "SECURITY_DELAY", default, deserialize_with = "de_opt_f32")]
    pub security_delay: Option<f32>,
    #[serde(rename = "AIRLINE_DELAY", default, deserialize_with = "de_opt_f32")]
    pub airline_delay: Option<f32>,
    #[serde(rename = "LATE_AIRCRAFT_DELAY", default, deserialize_with = "de_opt_f32")]
    pub late_aircraft_delay: Option<f32>,
    #[serde(rename = "WEATHER_DELAY", default, deserialize_with = "de_opt_f32")]
    pub weather_delay: Option<f32>,
}

/// An insertable `fact_flights` row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::fact_flights)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewFactFlight {
    pub date_id: NaiveDate,
    pub airline_id: Option<String>,
    pub flight_number: Option<String>,
    pub tail_number: Option<String>,
    pub origin_airport: Option<String>,
    pub dest_airport: Option<String>,
    pub scheduled_departure: Option<NaiveTime>,
    pub departure_time: Option<NaiveTime>,
    pub departure_delay: Option<i32>,
    pub scheduled_time: Option<i32>,
    pub elapsed_time: Option<i32>,
    pub air_time: Option<i32>,
    pub distance: Option<f32>,
    pub scheduled_arrival: Option<NaiveTime>,
    pub arrival_time: Option<NaiveTime>,
    pub arrival_delay: Option<i32>,
    pub overall_delay: Option<i32>,
    pub diverted: Option<bool>,
    pub cancelled: Option<bool>,
    pub cancellation_code: Option<String>,
    pub air_system_delay: Option<f32>,
    pub security_delay: Option<f32>,
    pub airline_delay: Option<f32>,
    pub late_aircraft_delay: Option<f32>,
    pub weather_delay: Option<f32>,
}

/// A time field that was present but unparsable and therefore stored NULL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NulledTime {
    pub column: &'static str,
    pub raw: String,
}

/// A cleaned row ready for insertion, plus the fields that were nulled
/// along the way so the caller can log or count them.
#[derive(Debug, Clone)]
pub struct CleanedFlight {
    pub fact: NewFactFlight,
    pub nulled_times: Vec<NulledTime>,
}

/// Outcome of parsing an HHMM-encoded time column.
///
/// `Missing` and `Invalid` both end up as NULL in the fact table, but the
/// distinction lets the loader report values it had to throw away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HhmmParse {
    Time(NaiveTime),
    Missing,
    Invalid,
}

impl HhmmParse {
    pub fn time(self) -> Option<NaiveTime> {
        match self {
            HhmmParse::Time(t) => Some(t),
            _ => None,
        }
    }
}

/// Parse an integer encoded as HHMM (930 -> 09:30, 1725 -> 17:25) into a
/// time of day. Out-of-range values (minute >= 60, hour > 23, negative)
/// and non-numeric input yield `Invalid`; absent input yields `Missing`.
/// This never fails the row.
pub fn parse_hhmm(raw: Option<&str>) -> HhmmParse {
    let Some(raw) = raw else {
        return HhmmParse::Missing;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "NA" {
        return HhmmParse::Missing;
    }

    let value = match trimmed.parse::<i32>() {
        Ok(v) => v,
        // Some exports carry the encoding as a float ("930.0").
        Err(_) => match trimmed.parse::<f64>() {
            Ok(f) if f.fract() == 0.0 && f.abs() < i32::MAX as f64 => f as i32,
            _ => return HhmmParse::Invalid,
        },
    };
    if value < 0 {
        return HhmmParse::Invalid;
    }

    let (hour, minute) = (value / 100, value % 100);
    match NaiveTime::from_hms_opt(hour as u32, minute as u32, 0) {
        Some(t) => HhmmParse::Time(t),
        None => HhmmParse::Invalid,
    }
}

/// Overall delay = departure delay + arrival delay, treating a missing
/// delay as zero for this sum only. The per-field values stay NULL.
pub fn overall_delay(departure: Option<i32>, arrival: Option<i32>) -> i32 {
    departure.unwrap_or(0) + arrival.unwrap_or(0)
}

/// Derive the cancellation dimension key: NULL unless the flight was
/// actually cancelled and a usable reason is recorded, otherwise the
/// first character of the reason.
pub fn cancellation_code(cancelled: Option<bool>, reason: Option<&str>) -> Option<String> {
    if cancelled != Some(true) {
        return None;
    }
    let reason = reason?.trim();
    if reason.is_empty() || reason == "NA" {
        return None;
    }
    reason.chars().next().map(|c| c.to_string())
}

/// Clean one raw CSV row into a fact row.
///
/// An invalid year/month/day combination fails the row; unparsable time
/// columns are downgraded to NULL and reported in `nulled_times`.
pub fn clean_flight(raw: &RawFlight, line: u64) -> Result<CleanedFlight, LoadError> {
    let (Some(year), Some(month), Some(day)) = (raw.year, raw.month, raw.day) else {
        return Err(LoadError::BadRow {
            line,
            reason: "missing YEAR/MONTH/DAY".to_string(),
        });
    };
    let date_id = NaiveDate::from_ymd_opt(year, month as u32, day as u32).ok_or_else(|| {
        LoadError::BadRow {
            line,
            reason: format!("invalid calendar date {year}-{month}-{day}"),
        }
    })?;

    let mut nulled_times = Vec::new();
    let mut take_time = |column: &'static str, raw: &Option<String>| -> Option<NaiveTime> {
        match parse_hhmm(raw.as_deref()) {
            HhmmParse::Time(t) => Some(t),
            HhmmParse::Missing => None,
            HhmmParse::Invalid => {
                nulled_times.push(NulledTime {
                    column,
                    raw: raw.clone().unwrap_or_default(),
                });
                None
            }
        }
    };

    let scheduled_departure = take_time("SCHEDULED_DEPARTURE", &raw.scheduled_departure);
    let departure_time = take_time("DEPARTURE_TIME", &raw.departure_time);
    let scheduled_arrival = take_time("SCHEDULED_ARRIVAL", &raw.scheduled_arrival);
    let arrival_time = take_time("ARRIVAL_TIME", &raw.arrival_time);

    let fact = NewFactFlight {
        date_id,
        airline_id: raw.airline.clone(),
        flight_number: raw.flight_number.clone(),
        tail_number: raw.tail_number.clone(),
        origin_airport: raw.origin_airport.clone(),
        dest_airport: raw.destination_airport.clone(),
        scheduled_departure,
        departure_time,
        departure_delay: raw.departure_delay,
        scheduled_time: raw.scheduled_time,
        elapsed_time: raw.elapsed_time,
        air_time: raw.air_time,
        distance: raw.distance,
        scheduled_arrival,
        arrival_time,
        arrival_delay: raw.arrival_delay,
        overall_delay: Some(overall_delay(raw.departure_delay, raw.arrival_delay)),
        diverted: raw.diverted,
        cancelled: raw.cancelled,
        cancellation_code: cancellation_code(raw.cancelled, raw.cancellation_reason.as_deref()),
        air_system_delay: raw.air_system_delay,
        security_delay: raw.security_delay,
        airline_delay: raw.airline_delay,
        late_aircraft_delay: raw.late_aircraft_delay,
        weather_delay: raw.weather_delay,
    };

    Ok(CleanedFlight { fact, nulled_times })
}

fn non_sentinel(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "NA" {
        None
    } else {
        Some(trimmed)
    }
}

fn de_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(non_sentinel).map(str::to_string))
}

fn de_opt_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(trimmed) = raw.as_deref().and_then(non_sentinel) else {
        return Ok(None);
    };
    if let Ok(v) = trimmed.parse::<i32>() {
        return Ok(Some(v));
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.abs() < i32::MAX as f64 => Ok(Some(f as i32)),
        _ => Err(serde::de::Error::custom(format!(
            "invalid integer '{trimmed}'"
        ))),
    }
}

fn de_opt_f32<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(trimmed) = raw.as_deref().and_then(non_sentinel) else {
        return Ok(None);
    };
    trimmed
        .parse::<f32>()
        .map(Some)
        .map_err(|_| serde::de::Error::custom(format!("invalid number '{trimmed}'")))
}

fn de_opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(trimmed) = raw.as_deref().and_then(non_sentinel) else {
        return Ok(None);
    };
    match trimmed {
        "0" => Ok(Some(false)),
        "1" => Ok(Some(true)),
        other => match other.to_ascii_lowercase().as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(serde::de::Error::custom(format!(
                "invalid boolean '{other}'"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hhmm(raw: &str) -> HhmmParse {
        parse_hhmm(Some(raw))
    }

    #[test]
    fn parse_hhmm_valid_encodings() {
        assert_eq!(
            hhmm("930"),
            HhmmParse::Time(NaiveTime::from_hms_opt(9, 30, 0).unwrap())
        );
        assert_eq!(
            hhmm("1725"),
            HhmmParse::Time(NaiveTime::from_hms_opt(17, 25, 0).unwrap())
        );
        assert_eq!(
            hhmm("0"),
            HhmmParse::Time(NaiveTime::from_hms_opt(0, 0, 0).unwrap())
        );
        assert_eq!(
            hhmm("2359"),
            HhmmParse::Time(NaiveTime::from_hms_opt(23, 59, 0).unwrap())
        );
        // leading zeros and a float-typed export both work
        assert_eq!(
            hhmm("0005"),
            HhmmParse::Time(NaiveTime::from_hms_opt(0, 5, 0).unwrap())
        );
        assert_eq!(
            hhmm("930.0"),
            HhmmParse::Time(NaiveTime::from_hms_opt(9, 30, 0).unwrap())
        );
    }

    #[test]
    fn parse_hhmm_rejects_out_of_range() {
        assert_eq!(hhmm("2400"), HhmmParse::Invalid);
        assert_eq!(hhmm("1060"), HhmmParse::Invalid);
        assert_eq!(hhmm("999999"), HhmmParse::Invalid);
        assert_eq!(hhmm("-5"), HhmmParse::Invalid);
        assert_eq!(hhmm("12:30"), HhmmParse::Invalid);
        assert_eq!(hhmm("abc"), HhmmParse::Invalid);
        assert_eq!(hhmm("9.5"), HhmmParse::Invalid);
    }

    #[test]
    fn parse_hhmm_missing_is_distinguished_from_invalid() {
        assert_eq!(parse_hhmm(None), HhmmParse::Missing);
        assert_eq!(hhmm(""), HhmmParse::Missing);
        assert_eq!(hhmm("  "), HhmmParse::Missing);
        assert_eq!(hhmm("NA"), HhmmParse::Missing);
    }

    #[test]
    fn overall_delay_treats_missing_as_zero() {
        assert_eq!(overall_delay(None, None), 0);
        assert_eq!(overall_delay(Some(7), None), 7);
        assert_eq!(overall_delay(None, Some(15)), 15);
        assert_eq!(overall_delay(Some(-11), Some(-22)), -33);
    }

    #[test]
    fn cancellation_code_rules() {
        assert_eq!(cancellation_code(Some(true), Some("A")), Some("A".into()));
        assert_eq!(
            cancellation_code(Some(true), Some("A-carrier")),
            Some("A".into())
        );
        assert_eq!(cancellation_code(Some(true), Some("NA")), None);
        assert_eq!(cancellation_code(Some(true), Some("")), None);
        assert_eq!(cancellation_code(Some(true), None), None);
        // an uncancelled (or unknown) flight never carries a code
        assert_eq!(cancellation_code(Some(false), Some("B")), None);
        assert_eq!(cancellation_code(None, Some("B")), None);
    }

    fn raw_flight() -> RawFlight {
        RawFlight {
            year: Some(2015),
            month: Some(1),
            day: Some(1),
            airline: Some("AS".into()),
            flight_number: Some("98".into()),
            tail_number: Some("N407AS".into()),
            origin_airport: Some("ANC".into()),
            destination_airport: Some("SEA".into()),
            scheduled_departure: Some("5".into()),
            departure_time: Some("2354".into()),
            departure_delay: Some(-11),
            scheduled_time: Some(205),
            elapsed_time: Some(194),
            air_time: Some(169),
            distance: Some(1448.0),
            scheduled_arrival: Some("430".into()),
            arrival_time: Some("408".into()),
            arrival_delay: Some(-22),
            diverted: Some(false),
            cancelled: Some(false),
            cancellation_reason: None,
            air_system_delay: None,
            security_delay: None,
            airline_delay: None,
            late_aircraft_delay: None,
            weather_delay: None,
        }
    }

    #[test]
    fn clean_flight_assembles_date_and_times() {
        let cleaned = clean_flight(&raw_flight(), 2).unwrap();
        assert_eq!(
            cleaned.fact.date_id,
            NaiveDate::from_ymd_opt(2015, 1, 1).unwrap()
        );
        assert_eq!(
            cleaned.fact.scheduled_departure,
            NaiveTime::from_hms_opt(0, 5, 0)
        );
        assert_eq!(
            cleaned.fact.departure_time,
            NaiveTime::from_hms_opt(23, 54, 0)
        );
        assert_eq!(cleaned.fact.overall_delay, Some(-33));
        assert_eq!(cleaned.fact.cancellation_code, None);
        assert!(cleaned.nulled_times.is_empty());
    }

    #[test]
    fn clean_flight_nulls_invalid_times_without_failing() {
        let mut raw = raw_flight();
        raw.departure_time = Some("2460".into());
        let cleaned = clean_flight(&raw, 2).unwrap();
        assert_eq!(cleaned.fact.departure_time, None);
        assert_eq!(
            cleaned.nulled_times,
            vec![NulledTime {
                column: "DEPARTURE_TIME",
                raw: "2460".into()
            }]
        );
    }

    #[test]
    fn clean_flight_keeps_missing_delays_null_in_aggregate() {
        let mut raw = raw_flight();
        raw.departure_delay = None;
        raw.arrival_delay = Some(15);
        let cleaned = clean_flight(&raw, 2).unwrap();
        assert_eq!(cleaned.fact.departure_delay, None);
        assert_eq!(cleaned.fact.arrival_delay, Some(15));
        assert_eq!(cleaned.fact.overall_delay, Some(15));
    }

    #[test]
    fn clean_flight_fails_on_impossible_date() {
        let mut raw = raw_flight();
        raw.month = Some(2);
        raw.day = Some(30);
        let err = clean_flight(&raw, 7).unwrap_err();
        assert!(matches!(err, LoadError::BadRow { line: 7, .. }));
    }

    #[test]
    fn clean_flight_fails_on_missing_date_parts() {
        let mut raw = raw_flight();
        raw.day = None;
        assert!(clean_flight(&raw, 3).is_err());
    }

    #[test]
    fn cancelled_flight_carries_first_reason_character() {
        let mut raw = raw_flight();
        raw.cancelled = Some(true);
        raw.cancellation_reason = Some("B".into());
        let cleaned = clean_flight(&raw, 2).unwrap();
        assert_eq!(cleaned.fact.cancellation_code, Some("B".into()));
    }

    #[test]
    fn sentinel_values_deserialize_to_null() {
        let csv = "YEAR,MONTH,DAY,DEPARTURE_DELAY,ARRIVAL_DELAY,DISTANCE,DIVERTED,CANCELLED,TAIL_NUMBER,CANCELLATION_REASON\n\
                   2015,1,1,NA,,NA,,1,NA,\n";
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let raw: RawFlight = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(raw.departure_delay, None);
        assert_eq!(raw.arrival_delay, None);
        assert_eq!(raw.distance, None);
        assert_eq!(raw.diverted, None);
        assert_eq!(raw.cancelled, Some(true));
        assert_eq!(raw.tail_number, None);
        assert_eq!(raw.cancellation_reason, None);
    }
}
