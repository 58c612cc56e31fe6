use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use flightmart::commands::{LoadDataArgs, handle_init_schema, handle_load_data, handle_report_view};
use flightmart::db::{self, DbConfig};
use flightmart::flights_repo::{CommitGranularity, DEFAULT_BATCH_SIZE, LoadOptions};

#[derive(Parser, Debug)]
#[command(
    name = "flightmart",
    about = "Load the 2015 flight-delay dataset into a PostgreSQL star schema."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Drop and recreate the dimension and fact tables
    InitSchema {
        /// Also build the denormalized reporting view
        #[arg(long, default_value_t = false)]
        report_view: bool,
    },
    /// Load CSV inputs into the star schema (dimensions before facts)
    LoadData {
        /// Airlines CSV (IATA_CODE, AIRLINE)
        #[arg(long)]
        airlines: Option<PathBuf>,
        /// Airports CSV (IATA_CODE, AIRPORT, CITY, STATE, COUNTRY, LATITUDE, LONGITUDE)
        #[arg(long)]
        airports: Option<PathBuf>,
        /// Cancellation codes CSV (CANCELLATION_REASON, CANCELLATION_DESCRIPTION)
        #[arg(long)]
        cancellation_codes: Option<PathBuf>,
        /// Flights CSV (the 31-column fact source)
        #[arg(long)]
        flights: Option<PathBuf>,
        /// First day of the date dimension
        #[arg(long, default_value = "2015-01-01")]
        dates_start: NaiveDate,
        /// Last day of the date dimension, inclusive
        #[arg(long, default_value = "2015-12-31")]
        dates_end: NaiveDate,
        /// Do not (re)generate the date dimension
        #[arg(long, default_value_t = false)]
        skip_dates: bool,
        /// Fact rows per batch
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
        /// Commit granularity for the fact load
        #[arg(long, value_enum, default_value = "batch")]
        commit: CommitGranularity,
    },
    /// (Re)build the denormalized reporting view
    ReportView,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = DbConfig::from_env()?;
    let mut conn = db::establish(&config)?;

    match cli.command {
        Commands::InitSchema { report_view } => handle_init_schema(&mut conn, report_view),
        Commands::LoadData {
            airlines,
            airports,
            cancellation_codes,
            flights,
            dates_start,
            dates_end,
            skip_dates,
            batch_size,
            commit,
        } => handle_load_data(
            &mut conn,
            LoadDataArgs {
                airlines_path: airlines,
                airports_path: airports,
                cancellation_codes_path: cancellation_codes,
                flights_path: flights,
                dates_start,
                dates_end,
                skip_dates,
                options: LoadOptions { batch_size, commit },
            },
        ),
        Commands::ReportView => handle_report_view(&mut conn),
    }
}
