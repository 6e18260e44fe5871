use super::category::{categorize, Category};
use crate::utils::unicode::{single_line, truncate_chars};
use chrono::{Local, NaiveDateTime, Timelike};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const PREVIEW_CHARS: usize = 30;

/// A recorded clip. On disk the category is informational only: reading an item
/// recomputes it from the content, whatever label was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredItem")]
pub struct HistoryItem {
    pub content: String,
    pub category: Category,
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
}

impl HistoryItem {
    pub fn new(content: String) -> Self {
        Self::at(content, now())
    }

    pub fn at(content: String, timestamp: NaiveDateTime) -> Self {
        let category = categorize(&content);
        Self {
            content,
            category,
            timestamp,
        }
    }

    /// Replace the content. The timestamp is left untouched.
    pub fn set_content(&mut self, content: String) {
        self.category = categorize(&content);
        self.content = content;
    }

    pub fn matches(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty() || self.content.to_lowercase().contains(needle_lower)
    }

    pub fn timestamp_str(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// One-line list entry: `"{category}: {preview}... {timestamp}"`.
    pub fn summary(&self, show_timestamp: bool) -> String {
        let preview = single_line(truncate_chars(&self.content, PREVIEW_CHARS));
        if show_timestamp {
            format!("{}: {}... {}", self.category, preview, self.timestamp_str())
        } else {
            format!("{}: {}...", self.category, preview)
        }
    }
}

#[derive(Deserialize)]
struct StoredItem {
    content: String,
    #[serde(default, rename = "category")]
    _category: IgnoredAny,
    #[serde(with = "timestamp_format")]
    timestamp: NaiveDateTime,
}

impl From<StoredItem> for HistoryItem {
    fn from(stored: StoredItem) -> Self {
        Self::at(stored.content, stored.timestamp)
    }
}

/// Second precision keeps in-memory items identical to what reloads from disk.
fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 1)
            .unwrap()
    }

    #[test]
    fn test_new_categorizes() {
        let item = HistoryItem::new("report.pdf".to_string());
        assert_eq!(item.category, Category::Document);
        assert_eq!(item.timestamp.nanosecond(), 0);
    }

    #[test]
    fn test_set_content_keeps_timestamp() {
        let mut item = HistoryItem::at("hello".to_string(), fixed_time());
        item.set_content("https://example.com".to_string());
        assert_eq!(item.content, "https://example.com");
        assert_eq!(item.category, Category::Url);
        assert_eq!(item.timestamp, fixed_time());
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let item = HistoryItem::at("Hello World".to_string(), fixed_time());
        assert!(item.matches("world"));
        assert!(item.matches(""));
        assert!(!item.matches("planet"));
    }

    #[test]
    fn test_summary() {
        let item = HistoryItem::at("line one\nline two".to_string(), fixed_time());
        assert_eq!(item.summary(false), "Text: line one line two...");
        assert_eq!(
            item.summary(true),
            "Text: line one line two... 2025-12-31 23:59:01"
        );

        let long = HistoryItem::at("x".repeat(40), fixed_time());
        assert_eq!(long.summary(false), format!("Text: {}...", "x".repeat(30)));
    }

    #[test]
    fn test_json_shape() {
        let item = HistoryItem::at("a.png".to_string(), fixed_time());
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "content": "a.png",
                "category": "Image File",
                "timestamp": "2025-12-31 23:59:01"
            })
        );
    }

    #[test]
    fn test_stored_category_is_recomputed() {
        let raw = r#"{"content":"clip.mov","category":"Picture","timestamp":"2025-12-31 23:59:01"}"#;
        let item: HistoryItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item, HistoryItem::at("clip.mov".to_string(), fixed_time()));
        assert_eq!(item.category, Category::VideoFile);

        let raw = r#"{"content":"plain","timestamp":"2025-12-31 23:59:01"}"#;
        let item: HistoryItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.category, Category::Text);
    }

    #[test]
    fn test_rejects_bad_timestamp() {
        let raw = r#"{"content":"x","category":"Text","timestamp":"yesterday"}"#;
        assert!(serde_json::from_str::<HistoryItem>(raw).is_err());
    }
}
