pub mod identity;
pub mod ingestion;
pub mod server;
