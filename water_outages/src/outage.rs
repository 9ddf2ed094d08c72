use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Shown in place of a field the endpoint left out, sent as `null`, or sent blank.
pub const PLACEHOLDER: &str = "N/A";

/// One scheduled water interruption as published by İZSU.
///
/// Fields keep the text the endpoint sent; `None` means the key was absent or `null`.
/// Non-string values are kept as their JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Outage {
    #[serde(rename = "IlceAdi", default, deserialize_with = "text")]
    pub district: Option<String>,
    #[serde(rename = "Mahalleler", default, deserialize_with = "text")]
    pub neighborhoods: Option<String>,
    #[serde(rename = "KesintiSuresi", default, deserialize_with = "text")]
    pub duration: Option<String>,
    #[serde(rename = "Aciklama", default, deserialize_with = "text")]
    pub description: Option<String>,
}

fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }))
}

impl Outage {
    pub fn new(
        district: impl Into<String>,
        neighborhoods: impl Into<String>,
        duration: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            district: Some(district.into()),
            neighborhoods: Some(neighborhoods.into()),
            duration: Some(duration.into()),
            description: Some(description.into()),
        }
    }

    pub fn district_label(&self) -> &str {
        label(&self.district)
    }

    pub fn neighborhoods_label(&self) -> &str {
        label(&self.neighborhoods)
    }

    pub fn duration_label(&self) -> &str {
        label(&self.duration)
    }

    pub fn description_label(&self) -> &str {
        label(&self.description)
    }

    /// District text used for matching. Missing values match as the empty string.
    pub(crate) fn searchable_district(&self) -> &str {
        self.district.as_deref().unwrap_or_default()
    }

    pub(crate) fn searchable_neighborhoods(&self) -> &str {
        self.neighborhoods.as_deref().unwrap_or_default()
    }
}

fn label(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(text) if !text.trim().is_empty() => text,
        _ => PLACEHOLDER,
    }
}
