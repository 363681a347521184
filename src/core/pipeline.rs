use crate::core::columns::ColumnMapper;
use crate::core::ingest::FileIngestor;
use crate::core::phone::PhoneNormalizer;
use crate::domain::model::{CleanedRecord, ProcessingStats, RawTable, UnifiedTable};
use crate::utils::error::{LeadError, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Well-known lead columns of the scraper export format, looked up by
/// exact name. Absent columns read as empty strings.
const COL_NAME: &str = "Название";
const COL_CATEGORY: &str = "Category 0";
const COL_ADDRESS: &str = "Адрес";
const COL_URL: &str = "companyUrl";
const COL_TELEGRAM: &str = "telegram";
const COL_VK: &str = "vkontakte";

/// Orchestrates the whole cleaning run: per-file ingestion, phone
/// normalization, empty-row filtering and cross-file deduplication.
///
/// Dedup state lives for exactly one `process` call; the first occurrence
/// of a phone across the batch (file order, then row order) wins.
pub struct CleaningPipeline {
    ingestor: FileIngestor,
    column_mapper: ColumnMapper,
    phones: PhoneNormalizer,
}

impl CleaningPipeline {
    pub fn new() -> Self {
        Self {
            ingestor: FileIngestor::new(),
            column_mapper: ColumnMapper::new(),
            phones: PhoneNormalizer::new(),
        }
    }

    /// Clean `file_paths` into one unified table plus run statistics.
    ///
    /// All-or-nothing: an empty batch or any file that cannot be ingested
    /// aborts the run, and nothing built so far is returned.
    pub fn process(&self, file_paths: &[PathBuf]) -> Result<(UnifiedTable, ProcessingStats)> {
        if file_paths.is_empty() {
            return Err(LeadError::EmptyBatch);
        }

        let mut records = Vec::new();
        let mut stats = ProcessingStats::default();
        let mut seen_phones: HashSet<String> = HashSet::new();

        for path in file_paths {
            let table = self.ingestor.ingest(path).map_err(|err| match err {
                // Ingest-level failures already name the path.
                err @ LeadError::EncodingDetection { .. } => err,
                other => LeadError::FileProcessing {
                    path: path.clone(),
                    message: other.to_string(),
                },
            })?;
            stats.total_rows += table.len();

            let kept = self.clean_file(path, table, &mut stats, &mut seen_phones);
            tracing::info!(
                "processed {}: {} rows kept",
                path.display(),
                kept.len()
            );
            records.extend(kept);
        }

        stats.final_rows = records.len();
        stats.unique_phones = seen_phones.len();

        match serde_json::to_string(&stats) {
            Ok(json) => tracing::info!("cleaning finished: {}", json),
            Err(_) => tracing::info!("cleaning finished: {:?}", stats),
        }

        Ok((UnifiedTable { records }, stats))
    }

    /// Clean one ingested file: normalize phones, drop phone-less rows,
    /// drop rows whose phone set intersects the run-wide seen set.
    fn clean_file(
        &self,
        path: &Path,
        table: RawTable,
        stats: &mut ProcessingStats,
        seen_phones: &mut HashSet<String>,
    ) -> Vec<CleanedRecord> {
        let source_file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let column_map = self.column_mapper.map_phone_columns(&table.columns);

        let mut kept = Vec::new();
        for row in table.rows {
            let phone_1 = self.lookup_phone(&row, column_map.phone_1.as_deref());
            let phone_2 = self.lookup_phone(&row, column_map.phone_2.as_deref());

            let record = CleanedRecord {
                name: field(&row, COL_NAME),
                category: field(&row, COL_CATEGORY),
                phone_1,
                phone_2,
                address: field(&row, COL_ADDRESS),
                url: field(&row, COL_URL),
                telegram: field(&row, COL_TELEGRAM),
                vk: field(&row, COL_VK),
                source_file: source_file.clone(),
            };

            if !record.has_phone() {
                stats.removed_empty_phones += 1;
                continue;
            }

            // A row whose phone_1 == phone_2 contributes the value once;
            // the set collapses it without a special case.
            let row_phones: HashSet<String> =
                record.phones().map(str::to_owned).collect();
            if !row_phones.is_disjoint(seen_phones) {
                stats.removed_duplicates += 1;
                continue;
            }

            seen_phones.extend(row_phones);
            kept.push(record);
        }

        kept
    }

    fn lookup_phone(
        &self,
        row: &HashMap<String, String>,
        column: Option<&str>,
    ) -> Option<String> {
        let raw = column.and_then(|col| row.get(col)).map(String::as_str);
        self.phones.normalize(raw)
    }
}

impl Default for CleaningPipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn field(row: &HashMap<String, String>, column: &str) -> String {
    row.get(column).cloned().unwrap_or_default()
}
