use crate::domain::model::ColumnMap;

/// Phone-like name fragments, in priority order. Exports name their phone
/// columns inconsistently (`phone_1`, `Телефон 1`, `mobile`...), so matching
/// is a case-insensitive substring test.
const PHONE_PATTERNS: [&str; 13] = [
    "phone_1",
    "phone_2",
    "phone1",
    "phone2",
    "телефон",
    "телефон 1",
    "телефон 2",
    "phone",
    "tel",
    "telephone",
    "mobile",
    "мобильный",
    "рабочий",
];

/// Names a canonical slot resolves to when nothing matched and the mapper
/// degrades to literal column names.
const DEFAULT_PHONE_1: &str = "phone_1";
const DEFAULT_PHONE_2: &str = "phone_2";

/// Resolves which of a file's columns feed the canonical `phone_1` and
/// `phone_2` slots.
pub struct ColumnMapper;

impl ColumnMapper {
    pub fn new() -> Self {
        Self
    }

    /// Build the phone-column mapping for one file's header.
    ///
    /// Candidate columns are collected in pattern-priority order and
    /// deduplicated; the first two distinct matches become `phone_1` and
    /// `phone_2`. With zero matches this logs a warning and falls back to
    /// assuming literal `phone_1`/`phone_2` columns exist — a file with no
    /// contactable leads is valid input, so this degrades instead of
    /// failing.
    pub fn map_phone_columns(&self, columns: &[String]) -> ColumnMap {
        let lowered: Vec<(String, &String)> = columns
            .iter()
            .map(|col| (col.to_lowercase(), col))
            .collect();

        let mut matches: Vec<&String> = Vec::new();
        for pattern in PHONE_PATTERNS {
            for (col_lower, col) in &lowered {
                if col_lower.contains(pattern) && !matches.contains(col) {
                    matches.push(*col);
                }
            }
        }

        if matches.is_empty() {
            tracing::warn!(
                "no phone-like columns found, assuming literal {}/{}; available columns: {:?}",
                DEFAULT_PHONE_1,
                DEFAULT_PHONE_2,
                columns
            );
            return ColumnMap {
                phone_1: existing(columns, DEFAULT_PHONE_1),
                phone_2: existing(columns, DEFAULT_PHONE_2),
            };
        }

        let map = ColumnMap {
            phone_1: matches.first().map(|c| (*c).clone()),
            phone_2: matches.get(1).map(|c| (*c).clone()),
        };
        tracing::debug!(
            "phone columns resolved: phone_1={:?}, phone_2={:?}",
            map.phone_1,
            map.phone_2
        );
        map
    }
}

impl Default for ColumnMapper {
    fn default() -> Self {
        Self::new()
    }
}

fn existing(columns: &[String], name: &str) -> Option<String> {
    columns.iter().find(|c| c.as_str() == name).cloned()
}
