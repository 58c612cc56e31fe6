use anyhow::Result;
use diesel::PgConnection;

use crate::report::build_report_view;

pub fn handle_report_view(conn: &mut PgConnection) -> Result<()> {
    build_report_view(conn)
}
