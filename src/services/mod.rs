//! Business logic services
//!
//! Services orchestrate the storage components; handlers stay thin and
//! delegate here.

pub mod ingestion;

pub use ingestion::IngestionService;
