use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::analyzers::DroughtConfig;
use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_DATA_DIR, DROUGHT_PERCENTAGE_THRESHOLD, DROUGHT_VHI_THRESHOLD, SETTINGS_ENV_PREFIX,
    SETTINGS_FILE, TOTAL_REGIONS,
};

/// Runtime settings, layered as defaults, then a TOML file, then `VHI_*` variables.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Settings {
    pub data_dir: PathBuf,

    pub output_dir: PathBuf,

    #[validate(range(min = 1))]
    pub total_regions: usize,

    pub drought_vhi_threshold: f64,

    #[validate(range(min = 0.0, max = 100.0))]
    pub drought_percentage: f64,
}

impl Settings {
    /// Load settings. An explicit path must exist; otherwise `vhi.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(SETTINGS_FILE)).required(false),
        };

        let settings: Settings = Config::builder()
            .set_default("data_dir", DEFAULT_DATA_DIR)?
            .set_default("output_dir", ".")?
            .set_default("total_regions", TOTAL_REGIONS as i64)?
            .set_default("drought_vhi_threshold", DROUGHT_VHI_THRESHOLD)?
            .set_default("drought_percentage", DROUGHT_PERCENTAGE_THRESHOLD)?
            .add_source(file)
            .add_source(Environment::with_prefix(SETTINGS_ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Apply command-line drought overrides, checked against the same bounds as the file.
    pub fn with_drought_overrides(
        mut self,
        percentage: Option<f64>,
        total_regions: Option<usize>,
    ) -> Result<Self> {
        if let Some(percentage) = percentage {
            self.drought_percentage = percentage;
        }
        if let Some(total_regions) = total_regions {
            self.total_regions = total_regions;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn drought_config(&self) -> DroughtConfig {
        DroughtConfig {
            vhi_threshold: self.drought_vhi_threshold,
            percentage_threshold: self.drought_percentage,
            total_regions: self.total_regions,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            output_dir: PathBuf::from("."),
            total_regions: TOTAL_REGIONS,
            drought_vhi_threshold: DROUGHT_VHI_THRESHOLD,
            drought_percentage: DROUGHT_PERCENTAGE_THRESHOLD,
        }
    }
}
