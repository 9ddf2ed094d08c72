use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "https://www.izsu.gov.tr/SuKesintileri/suKesintileriGetirJS";
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct OutagesSettings {
    pub endpoint: String,
    pub timeout_seconds: u64,
}

impl OutagesSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for OutagesSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}
