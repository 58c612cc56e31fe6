use anyhow::Result;
use diesel::PgConnection;

use crate::report::build_report_view;
use crate::schema_init::init_schema;

/// Drop and recreate every table of the star schema, optionally followed
/// by the reporting view.
pub fn handle_init_schema(conn: &mut PgConnection, with_report_view: bool) -> Result<()> {
    init_schema(conn)?;
    if with_report_view {
        build_report_view(conn)?;
    }
    Ok(())
}
