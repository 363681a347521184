use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One parsed input file: header names in file order plus the data rows,
/// each row keyed by the original column name. Lives only while a single
/// file is being cleaned.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Which source columns feed the canonical phone slots, resolved once per
/// file. `None` means no source column was found and the slot stays empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub phone_1: Option<String>,
    pub phone_2: Option<String>,
}

/// A lead that survived phone normalization. At least one of the two phones
/// is set; the filtering step drops rows where both came out invalid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub name: String,
    pub category: String,
    /// Canonical 11-digit phone, first digit 7 or 8.
    pub phone_1: Option<String>,
    pub phone_2: Option<String>,
    pub address: String,
    pub url: String,
    pub telegram: String,
    pub vk: String,
    /// Name of the file the row came from.
    pub source_file: String,
}

impl CleanedRecord {
    /// The row's non-null phones, used as the dedup key.
    pub fn phones(&self) -> impl Iterator<Item = &str> {
        self.phone_1
            .as_deref()
            .into_iter()
            .chain(self.phone_2.as_deref())
    }

    pub fn has_phone(&self) -> bool {
        self.phone_1.is_some() || self.phone_2.is_some()
    }
}

/// All kept rows across the whole input batch, in file-then-row order,
/// with cross-file duplicates already removed.
#[derive(Debug, Clone, Default)]
pub struct UnifiedTable {
    pub records: Vec<CleanedRecord>,
}

impl UnifiedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Counters for one pipeline run.
/// `total_rows == final_rows + removed_duplicates + removed_empty_phones`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub total_rows: usize,
    pub removed_empty_phones: usize,
    pub removed_duplicates: usize,
    pub final_rows: usize,
    pub unique_phones: usize,
}

/// Fixed CRM export column labels, in output order.
pub const CRM_COLUMNS: [&str; 14] = [
    "Lead Title",
    "Work Phone",
    "Mobile Phone",
    "Address",
    "Corporate Site",
    "Telegram Contact",
    "VK Contact",
    "Company Name",
    "Comment",
    "Stage",
    "Source",
    "Service Type",
    "Phone Source",
    "Owner",
];

/// One row of the CRM import file. Every field is already a final string;
/// nothing downstream mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrmRecord {
    pub title: String,
    pub work_phone: String,
    pub mobile_phone: String,
    pub address: String,
    pub corporate_site: String,
    pub telegram_contact: String,
    pub vk_contact: String,
    pub company_name: String,
    pub comment: String,
    pub stage: String,
    pub source_label: String,
    pub service_type: String,
    pub source_file: String,
    pub owner: String,
}

impl CrmRecord {
    /// Field values in `CRM_COLUMNS` order.
    pub fn to_row(&self) -> [&str; 14] {
        [
            &self.title,
            &self.work_phone,
            &self.mobile_phone,
            &self.address,
            &self.corporate_site,
            &self.telegram_contact,
            &self.vk_contact,
            &self.company_name,
            &self.comment,
            &self.stage,
            &self.source_label,
            &self.service_type,
            &self.source_file,
            &self.owner,
        ]
    }
}
