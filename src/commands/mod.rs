pub mod init_schema;
pub mod load_data;
pub mod report_view;

pub use init_schema::handle_init_schema;
pub use load_data::{LoadDataArgs, handle_load_data};
pub use report_view::handle_report_view;
