use crate::core::crm::CrmConfig;
use crate::utils::error::{LeadError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration: the manager roster and the fixed CRM labels.
/// Loaded from a TOML file or built from defaults; the pipeline and mapper
/// receive the values explicitly instead of reading ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_managers")]
    pub managers: Vec<String>,

    #[serde(default)]
    pub crm: CrmSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmSection {
    #[serde(default = "default_stage")]
    pub stage: String,

    #[serde(default = "default_source")]
    pub source_label: String,

    #[serde(default = "default_service_type")]
    pub service_type: String,
}

fn default_managers() -> Vec<String> {
    vec!["Менеджер 1".to_string(), "Менеджер 2".to_string()]
}

fn default_stage() -> String {
    "Новая заявка".to_string()
}

fn default_source() -> String {
    "Холодный звонок".to_string()
}

fn default_service_type() -> String {
    "ГЦК".to_string()
}

impl Default for CrmSection {
    fn default() -> Self {
        Self {
            stage: default_stage(),
            source_label: default_source(),
            service_type: default_service_type(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            managers: default_managers(),
            crm: CrmSection::default(),
        }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| LeadError::ConfigError {
            message: format!("TOML parsing error: {e}"),
        })
    }

    /// The CRM constants in the form the mapper takes.
    pub fn crm_config(&self) -> CrmConfig {
        CrmConfig {
            stage: self.crm.stage.clone(),
            source_label: self.crm.source_label.clone(),
            service_type: self.crm.service_type.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (index, manager) in self.managers.iter().enumerate() {
            if manager.trim().is_empty() {
                return Err(LeadError::InvalidConfigValue {
                    field: format!("managers[{index}]"),
                    value: manager.clone(),
                    reason: "manager name cannot be blank".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_full_config() {
        let toml_content = r#"
managers = ["Иванов", "Петров", "Сидорова"]

[crm]
stage = "Первичный контакт"
source_label = "Рассылка"
service_type = "Доставка"
"#;
        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.managers.len(), 3);
        assert_eq!(config.crm.stage, "Первичный контакт");
        assert_eq!(config.crm_config().service_type, "Доставка");
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.managers, vec!["Менеджер 1", "Менеджер 2"]);
        assert_eq!(config.crm.stage, "Новая заявка");
        assert_eq!(config.crm.source_label, "Холодный звонок");
        assert_eq!(config.crm.service_type, "ГЦК");
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = AppConfig::from_toml_str("managers = not valid").unwrap_err();
        assert!(matches!(err, LeadError::ConfigError { .. }));
    }

    #[test]
    fn blank_manager_fails_validation() {
        let config = AppConfig {
            managers: vec!["Иванов".into(), "  ".into()],
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"managers = [\"Solo\"]\n").unwrap();
        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.managers, vec!["Solo"]);
    }

    #[test]
    fn empty_roster_is_allowed() {
        let config = AppConfig::from_toml_str("managers = []\n").unwrap();
        assert!(config.managers.is_empty());
        assert!(config.validate().is_ok());
    }
}
