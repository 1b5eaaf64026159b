use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::metrics::SegmentKey;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drivers {
    #[serde(default)]
    pub positive_drivers: Vec<String>,
    #[serde(default)]
    pub negative_drivers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub topic: String,
    #[serde(default)]
    pub mentions: u32,
}

/// Fields the model leaves out come back empty rather than dropping the plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPlan {
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub expected_impact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentDescription {
    pub key: SegmentKey,
    pub segment: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopicsEnvelope {
    #[serde(default, deserialize_with = "lenient_entries")]
    pub(crate) topics: Vec<Topic>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActionPlansEnvelope {
    #[serde(default, deserialize_with = "lenient_entries")]
    pub(crate) action_plans: Vec<ActionPlan>,
}

/// Keeps every entry that parses; a malformed entry is skipped on its own.
fn lenient_entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!(error = %err, "skipping malformed insight entry");
                None
            }
        })
        .collect())
}

#[derive(Debug, Deserialize)]
pub(crate) struct DescriptionEnvelope {
    pub(crate) description: Option<String>,
}
