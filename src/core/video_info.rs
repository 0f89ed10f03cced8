//! Video metadata reported by the extraction tool

use serde::{Deserialize, Deserializer, Serialize};

/// Title used when the tool does not report one
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Video information and metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Video ID
    #[serde(default)]
    pub id: Option<String>,
    /// Video title
    #[serde(default = "unknown_title", deserialize_with = "title_or_unknown")]
    pub title: String,
    /// Duration in whole seconds
    #[serde(default, deserialize_with = "whole_seconds")]
    pub duration: Option<u64>,
    /// Channel or uploader name
    #[serde(default)]
    pub uploader: Option<String>,
}

impl VideoMetadata {
    /// Create metadata with only a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            duration: None,
            uploader: None,
        }
    }

    /// Set the duration in seconds
    pub fn with_duration(mut self, seconds: u64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Parse the JSON document printed by the extraction tool
    pub fn from_json(json: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(json)
    }
}

fn unknown_title() -> String {
    UNKNOWN_TITLE.to_string()
}

fn title_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let title = Option::<String>::deserialize(deserializer)?;
    Ok(title.unwrap_or_else(unknown_title))
}

// Durations come through as floats for some extractors; keep whole seconds.
fn whole_seconds<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let seconds = Option::<f64>::deserialize(deserializer)?;
    Ok(seconds
        .filter(|s| s.is_finite() && *s >= 0.0)
        .map(|s| s.trunc() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let json = br#"{
            "id": "dQw4w9WgXcQ",
            "title": "Never Gonna Give You Up",
            "duration": 212,
            "uploader": "Rick Astley",
            "formats": [{"format_id": "18"}],
            "view_count": 1
        }"#;
        let info = VideoMetadata::from_json(json).unwrap();
        assert_eq!(info.id.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(info.title, "Never Gonna Give You Up");
        assert_eq!(info.duration, Some(212));
        assert_eq!(info.uploader.as_deref(), Some("Rick Astley"));
    }

    #[test]
    fn test_missing_fields() {
        let info = VideoMetadata::from_json(b"{}").unwrap();
        assert_eq!(info.title, UNKNOWN_TITLE);
        assert_eq!(info.duration, None);
        assert_eq!(info.id, None);

        let info = VideoMetadata::from_json(br#"{"title": null, "duration": null}"#).unwrap();
        assert_eq!(info.title, UNKNOWN_TITLE);
        assert_eq!(info.duration, None);
    }

    #[test]
    fn test_fractional_duration_truncated() {
        let info = VideoMetadata::from_json(br#"{"title": "x", "duration": 65.9}"#).unwrap();
        assert_eq!(info.duration, Some(65));
    }

    #[test]
    fn test_malformed_document() {
        assert!(VideoMetadata::from_json(b"not json").is_err());
    }

    #[test]
    fn test_builder() {
        let info = VideoMetadata::new("Clip").with_duration(3661);
        assert_eq!(info.title, "Clip");
        assert_eq!(info.duration, Some(3661));
    }
}
