pub mod columns;
pub mod crm;
pub mod export;
pub mod ingest;
pub mod phone;
pub mod pipeline;

pub use crate::domain::model::{
    CleanedRecord, ColumnMap, CrmRecord, ProcessingStats, RawTable, UnifiedTable,
};
pub use crate::utils::error::Result;
