use std::path::PathBuf;

use serde::Deserialize;
use water_outages::config::OutagesSettings;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub outages: OutagesSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingSettings {
    pub file: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("logs/outages_client.log"),
        }
    }
}
