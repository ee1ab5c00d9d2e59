pub mod handlers;
pub mod ingest;
pub mod log;
pub mod payload;
