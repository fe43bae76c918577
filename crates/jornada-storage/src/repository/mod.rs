//! Database repositories for each table.

pub mod record;

pub use record::RecordRepo;
