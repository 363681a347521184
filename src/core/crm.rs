use crate::domain::model::{CrmRecord, UnifiedTable};
use crate::utils::url_clean::clean_url;

const TELEGRAM_PREFIX: &str = "https://t.me/";
const VK_PREFIX: &str = "https://vk.com/";

/// Fixed per-run CRM constants, threaded in explicitly by the caller.
#[derive(Debug, Clone)]
pub struct CrmConfig {
    pub stage: String,
    pub source_label: String,
    pub service_type: String,
}

/// Maps the cleaned unified table into the fixed CRM import schema.
///
/// Every derivation is a pure function of the row and its index; the
/// round-robin owner is `managers[i % M]`, not a stateful cursor, so a
/// given input always maps to the same output.
pub struct CrmMapper {
    managers: Vec<String>,
    config: CrmConfig,
}

impl CrmMapper {
    pub fn new(managers: Vec<String>, config: CrmConfig) -> Self {
        Self { managers, config }
    }

    /// Produce one `CrmRecord` per cleaned record, in input order. An empty
    /// table maps to an empty vector; an empty roster maps every owner to
    /// the empty string.
    pub fn map(&self, unified: &UnifiedTable) -> Vec<CrmRecord> {
        if unified.is_empty() {
            tracing::warn!("nothing to map: unified table is empty");
            return Vec::new();
        }

        let records: Vec<CrmRecord> = unified
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| CrmRecord {
                title: format!("{} - {}", record.category, record.name),
                work_phone: record.phone_1.clone().unwrap_or_default(),
                mobile_phone: record.phone_2.clone().unwrap_or_default(),
                address: record.address.clone(),
                corporate_site: clean_url(&record.url),
                telegram_contact: strip_telegram(&record.telegram),
                vk_contact: strip_prefix_ignore_case(&record.vk, VK_PREFIX),
                company_name: record.name.clone(),
                comment: String::new(),
                stage: self.config.stage.clone(),
                source_label: self.config.source_label.clone(),
                service_type: self.config.service_type.clone(),
                source_file: record.source_file.clone(),
                owner: self.owner(index),
            })
            .collect();

        tracing::info!("mapped {} leads into the CRM schema", records.len());
        records
    }

    fn owner(&self, row_index: usize) -> String {
        if self.managers.is_empty() {
            return String::new();
        }
        self.managers[row_index % self.managers.len()].clone()
    }
}

fn strip_telegram(value: &str) -> String {
    let stripped = strip_prefix_ignore_case(value, TELEGRAM_PREFIX);
    stripped
        .strip_prefix('@')
        .map(str::to_owned)
        .unwrap_or(stripped)
}

fn strip_prefix_ignore_case(value: &str, prefix: &str) -> String {
    // `get` instead of slicing: the value may hold multibyte text and the
    // prefix length must not split a character.
    match value.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => value[prefix.len()..].to_string(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CleanedRecord;

    fn record(name: &str, phone: &str) -> CleanedRecord {
        CleanedRecord {
            name: name.into(),
            category: "Кафе".into(),
            phone_1: Some(phone.into()),
            phone_2: None,
            address: "Москва".into(),
            url: String::new(),
            telegram: String::new(),
            vk: String::new(),
            source_file: "leads.csv".into(),
        }
    }

    fn config() -> CrmConfig {
        CrmConfig {
            stage: "Новая заявка".into(),
            source_label: "Холодный звонок".into(),
            service_type: "ГЦК".into(),
        }
    }

    fn table(records: Vec<CleanedRecord>) -> UnifiedTable {
        UnifiedTable { records }
    }

    #[test]
    fn owners_rotate_round_robin() {
        let managers = vec!["М1".to_string(), "М2".to_string(), "М3".to_string()];
        let mapper = CrmMapper::new(managers.clone(), config());
        let records = (0..7)
            .map(|i| record(&format!("Lead {i}"), &format!("7999123456{i}")))
            .collect();

        let out = mapper.map(&table(records));

        assert_eq!(out.len(), 7);
        for (i, rec) in out.iter().enumerate() {
            assert_eq!(rec.owner, managers[i % managers.len()]);
        }
    }

    #[test]
    fn empty_roster_leaves_owner_empty() {
        let mapper = CrmMapper::new(Vec::new(), config());
        let out = mapper.map(&table(vec![record("A", "79991234567")]));
        assert_eq!(out[0].owner, "");
    }

    #[test]
    fn title_joins_category_and_name() {
        let mapper = CrmMapper::new(vec!["М1".into()], config());
        let out = mapper.map(&table(vec![record("Ромашка", "79991234567")]));
        assert_eq!(out[0].title, "Кафе - Ромашка");
    }

    #[test]
    fn empty_category_keeps_leading_separator() {
        let mapper = CrmMapper::new(vec!["М1".into()], config());
        let mut lead = record("Ромашка", "79991234567");
        lead.category = String::new();
        let out = mapper.map(&table(vec![lead]));
        assert_eq!(out[0].title, " - Ромашка");
    }

    #[test]
    fn phones_copy_with_empty_for_null() {
        let mapper = CrmMapper::new(vec!["М1".into()], config());
        let out = mapper.map(&table(vec![record("A", "79991234567")]));
        assert_eq!(out[0].work_phone, "79991234567");
        assert_eq!(out[0].mobile_phone, "");
    }

    #[test]
    fn corporate_site_loses_query_string() {
        let mapper = CrmMapper::new(vec!["М1".into()], config());
        let mut lead = record("A", "79991234567");
        lead.url = "https://example.com?utm_source=google&utm_medium=cpc".into();
        let out = mapper.map(&table(vec![lead]));
        assert_eq!(out[0].corporate_site, "https://example.com");
    }

    #[test]
    fn telegram_handle_is_stripped() {
        let mapper = CrmMapper::new(vec!["М1".into()], config());

        let mut lead = record("A", "79991234567");
        lead.telegram = "https://t.me/testuser".into();
        let out = mapper.map(&table(vec![lead]));
        assert_eq!(out[0].telegram_contact, "testuser");

        let mut lead = record("B", "79991234568");
        lead.telegram = "@someuser".into();
        let out = mapper.map(&table(vec![lead]));
        assert_eq!(out[0].telegram_contact, "someuser");

        let mut lead = record("C", "79991234569");
        lead.telegram = "HTTPS://T.ME/Upper".into();
        let out = mapper.map(&table(vec![lead]));
        assert_eq!(out[0].telegram_contact, "Upper");
    }

    #[test]
    fn vk_prefix_is_stripped() {
        let mapper = CrmMapper::new(vec!["М1".into()], config());
        let mut lead = record("A", "79991234567");
        lead.vk = "https://vk.com/club123".into();
        let out = mapper.map(&table(vec![lead]));
        assert_eq!(out[0].vk_contact, "club123");
    }

    #[test]
    fn fixed_fields_come_from_config() {
        let mapper = CrmMapper::new(vec!["М1".into()], config());
        let out = mapper.map(&table(vec![record("A", "79991234567")]));
        assert_eq!(out[0].stage, "Новая заявка");
        assert_eq!(out[0].source_label, "Холодный звонок");
        assert_eq!(out[0].service_type, "ГЦК");
        assert_eq!(out[0].comment, "");
        assert_eq!(out[0].source_file, "leads.csv");
        assert_eq!(out[0].company_name, "A");
    }

    #[test]
    fn empty_table_maps_to_empty_output() {
        let mapper = CrmMapper::new(vec!["М1".into()], config());
        assert!(mapper.map(&table(Vec::new())).is_empty());
    }
}
