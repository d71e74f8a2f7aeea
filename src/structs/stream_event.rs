use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Wire payload of a single `data:` line on the analysis stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_progress")]
    pub progress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StreamEvent {
    pub fn step(step: &str, progress: u8) -> Self {
        Self {
            step: Some(step.to_string()),
            progress: Some(progress),
            ..Self::default()
        }
    }

    pub fn result(step: &str, result: Value) -> Self {
        Self {
            step: Some(step.to_string()),
            progress: Some(100),
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.result.is_some() || self.error.is_some()
    }
}

/// Accepts any JSON number (`100.0`, `-3`, `250`) and clamps it into a percentage.
fn lenient_progress<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.map(|value| value.clamp(0.0, 100.0).round() as u8))
}
