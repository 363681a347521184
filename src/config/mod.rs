pub mod toml_config;

pub use toml_config::AppConfig;

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "lead-etl")]
#[command(about = "Cleans lead-export CSV/TSV files and remaps them for CRM import")]
pub struct CliConfig {
    /// Input CSV/TSV files, processed in the given order.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// TOML config with the manager roster and CRM constants.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output CSV path. Defaults to a timestamped file in the current
    /// directory.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Override the manager roster from the config file.
    #[arg(long, value_delimiter = ',')]
    pub managers: Vec<String>,

    /// Override the CRM stage label.
    #[arg(long)]
    pub stage: Option<String>,

    /// Override the CRM source label.
    #[arg(long)]
    pub source_label: Option<String>,

    /// Override the CRM service-type label.
    #[arg(long)]
    pub service_type: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Load the file config (or defaults) and apply CLI overrides on top.
    pub fn resolve_app_config(&self) -> crate::utils::error::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if !self.managers.is_empty() {
            config.managers = self.managers.clone();
        }
        if let Some(stage) = &self.stage {
            config.crm.stage = stage.clone();
        }
        if let Some(source_label) = &self.source_label {
            config.crm.source_label = source_label.clone();
        }
        if let Some(service_type) = &self.service_type {
            config.crm.service_type = service_type.clone();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
            PathBuf::from(format!("crm_export_{stamp}.csv"))
        })
    }
}
