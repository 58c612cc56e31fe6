//! flightmart - loads the 2015 US flight-delay dataset into a PostgreSQL
//! star schema.
//!
//! Reference CSVs (airlines, airports, cancellation codes) are bulk-copied
//! into dimension tables, a calendar date dimension is generated, and the
//! large flights CSV is cleaned row by row and inserted into the fact
//! table in batches.

pub mod commands;
pub mod dates;
pub mod dates_repo;
pub mod db;
pub mod dimensions_repo;
pub mod errors;
pub mod events;
pub mod flights;
pub mod flights_repo;
pub mod report;
pub mod schema;
pub mod schema_init;

pub use errors::LoadError;
pub use events::{LoadEvent, LoadObserver, TracingObserver};
pub use flights::{HhmmParse, parse_hhmm};
