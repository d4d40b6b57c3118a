/// Body of an image-to-video request, as sent by the web UI.
///
/// Enumerated fields stay strings here so that unknown values reach the handler and turn into a
/// readable error response instead of a parse failure.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRequest {
    /// Picked image, relative to the served root (or absolute).
    pub path: String,
    pub frame_effect: String,
    pub frame_effect_shape: String,
    #[serde(default = "default_smoothing")]
    pub frame_smoothing: String,
    pub duration: DurationField,
}

fn default_smoothing() -> String {
    "off".to_string()
}

/// Clip length in seconds; form inputs post it as text.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum DurationField {
    Number(f64),
    Text(String),
}

impl DurationField {
    pub fn as_secs(&self) -> Option<f64> {
        let secs = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().ok()?,
        };
        secs.is_finite().then_some(secs)
    }
}

impl From<f64> for DurationField {
    fn from(secs: f64) -> Self {
        Self::Number(secs)
    }
}

/// Reply to a [`VideoRequest`]: either the clip's path relative to the served root, or an error.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum VideoResponse {
    Video { video: String },
    Error { error: String },
}

impl VideoResponse {
    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error { error: msg.into() }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/request/model.rs"]
mod tests;
