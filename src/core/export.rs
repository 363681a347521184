use crate::domain::model::{CrmRecord, CRM_COLUMNS};
use crate::utils::error::Result;
use csv::{QuoteStyle, WriterBuilder};
use std::io::Write;
use std::path::Path;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Write the CRM import file: UTF-8 with BOM, `;` delimiter, every field
/// quoted. The importer rejects anything else. The header row is written
/// even for an empty record set so consumers can rely on the columns.
pub fn write_crm_csv(path: &Path, records: &[CrmRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = std::fs::File::create(path)?;
    file.write_all(&UTF8_BOM)?;

    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .quote_style(QuoteStyle::Always)
        .from_writer(file);

    writer.write_record(CRM_COLUMNS)?;
    for record in records {
        writer.write_record(record.to_row())?;
    }
    writer.flush()?;

    tracing::info!("exported {} leads to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_record() -> CrmRecord {
        CrmRecord {
            title: "Кафе - Ромашка".into(),
            work_phone: "79991234567".into(),
            mobile_phone: String::new(),
            address: "Москва".into(),
            corporate_site: "https://cafe.ru".into(),
            telegram_contact: "cafe".into(),
            vk_contact: "cafe".into(),
            company_name: "Ромашка".into(),
            comment: String::new(),
            stage: "Новая заявка".into(),
            source_label: "Холодный звонок".into(),
            service_type: "ГЦК".into(),
            source_file: "leads.csv".into(),
            owner: "Менеджер 1".into(),
        }
    }

    #[test]
    fn writes_bom_semicolons_and_quotes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.csv");

        write_crm_csv(&path, &[sample_record()]).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], &UTF8_BOM);

        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("\"Lead Title\";\"Work Phone\""));
        assert!(header.ends_with("\"Owner\""));

        let row = lines.next().unwrap();
        assert!(row.contains("\"79991234567\""));
        // Empty fields are still quoted.
        assert!(row.contains("\"\";"));
        assert!(row.ends_with("\"Менеджер 1\""));
    }

    #[test]
    fn empty_export_still_has_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");

        write_crm_csv(&path, &[]).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert_eq!(text.lines().count(), 1);
        let header: Vec<&str> = text.trim_end().split(';').collect();
        assert_eq!(header.len(), CRM_COLUMNS.len());
    }

    #[test]
    fn creates_missing_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/dir/export.csv");
        write_crm_csv(&path, &[sample_record()]).unwrap();
        assert!(path.exists());
    }
}
