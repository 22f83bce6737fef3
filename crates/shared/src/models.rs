use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One Story to produce: the copy for a single article, optionally
/// augmented with the path of its captured screenshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub impact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<PathBuf>,
}

/// A feed entry that passed keyword and recency filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub title: String,
    pub url: String,
    pub source: String,
    pub published: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_screenshot_omitted_when_absent() {
        let item = Item {
            title: "Test".to_string(),
            url: "http://x.test".to_string(),
            subtitle: String::new(),
            impact: String::new(),
            screenshot: None,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("screenshot"));
    }

    #[test]
    fn test_item_parses_without_optional_fields() {
        let item: Item =
            serde_json::from_str(r#"{"title":"T","url":"http://x.test"}"#).unwrap();
        assert_eq!(item.subtitle, "");
        assert_eq!(item.impact, "");
        assert!(item.screenshot.is_none());
    }

    #[test]
    fn test_item_round_trips_screenshot_path() {
        let item = Item {
            title: "T".to_string(),
            url: "http://x.test".to_string(),
            subtitle: "S".to_string(),
            impact: "I".to_string(),
            screenshot: Some(PathBuf::from("shots/shot_01.png")),
        };
        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back.screenshot, Some(PathBuf::from("shots/shot_01.png")));
    }

    #[test]
    fn test_candidate_null_published() {
        let cand = Candidate {
            title: "T".to_string(),
            url: "http://x.test".to_string(),
            source: "Feed".to_string(),
            published: None,
        };
        let json = serde_json::to_string(&cand).unwrap();
        assert!(json.contains("\"published\":null"));
    }
}
