pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{AppConfig, CliConfig};
pub use core::crm::{CrmConfig, CrmMapper};
pub use core::export::write_crm_csv;
pub use core::ingest::FileIngestor;
pub use core::phone::PhoneNormalizer;
pub use core::pipeline::CleaningPipeline;
pub use domain::model::{CleanedRecord, CrmRecord, ProcessingStats, UnifiedTable, CRM_COLUMNS};
pub use utils::error::{LeadError, Result};
