use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One configured documentation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSource {
    pub topic: String,
    pub subtopic: String,
    pub url: String,
}

impl DocSource {
    pub fn new(
        topic: impl Into<String>,
        subtopic: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            subtopic: subtopic.into(),
            url: url.into(),
        }
    }
}

/// A fetched and text-extracted page. `text` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocPage {
    pub url: String,
    pub topic: String,
    pub subtopic: String,
    pub text: String,
}

/// topic -> subtopic -> extracted text.
///
/// Ordered maps keep the serialized cache byte-stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocIndex {
    topics: BTreeMap<String, BTreeMap<String, String>>,
}

impl DocIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a page, replacing any earlier text at the same key.
    pub fn insert(&mut self, page: DocPage) {
        self.topics
            .entry(page.topic)
            .or_default()
            .insert(page.subtopic, page.text);
    }

    /// Look up context text. A missing key means "no context available".
    pub fn get(&self, topic: &str, subtopic: &str) -> Option<&str> {
        self.topics
            .get(topic)
            .and_then(|subs| subs.get(subtopic))
            .map(String::as_str)
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.keys().map(String::as_str)
    }

    pub fn subtopics(&self, topic: &str) -> Vec<&str> {
        self.topics
            .get(topic)
            .map(|subs| subs.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// All (topic, subtopic) pairs in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.topics.iter().flat_map(|(topic, subs)| {
            subs.iter()
                .map(move |(sub, text)| (topic.as_str(), sub.as_str(), text.as_str()))
        })
    }

    /// Number of pages (subtopic entries) across all topics.
    pub fn len(&self) -> usize {
        self.topics.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A page that was skipped during a scrape run.
#[derive(Debug, Clone, Serialize)]
pub struct FetchFailure {
    pub url: String,
    pub topic: String,
    pub subtopic: String,
    pub reason: String,
}

/// Summary of one scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub succeeded: usize,
    pub skipped: usize,
    pub failures: Vec<FetchFailure>,
    pub cache_path: PathBuf,
    /// blake3 hex digest of the bytes written to the cache file.
    pub digest: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(topic: &str, subtopic: &str, text: &str) -> DocPage {
        DocPage {
            url: format!("https://docs.example/{}/{}", topic, subtopic),
            topic: topic.to_string(),
            subtopic: subtopic.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn insert_overwrites_same_key() {
        let mut index = DocIndex::new();
        index.insert(page("platform", "overview", "first"));
        index.insert(page("platform", "overview", "second"));
        assert_eq!(index.get("platform", "overview"), Some("second"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn same_subtopic_under_different_topics_is_independent() {
        let mut index = DocIndex::new();
        index.insert(page("a", "overview", "from a"));
        index.insert(page("b", "overview", "from b"));
        assert_eq!(index.get("a", "overview"), Some("from a"));
        assert_eq!(index.get("b", "overview"), Some("from b"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn missing_keys_return_none() {
        let index = DocIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.get("nope", "nothing"), None);
        assert!(index.subtopics("nope").is_empty());
    }

    #[test]
    fn serializes_as_plain_nested_object() {
        let mut index = DocIndex::new();
        index.insert(page("platform", "overview", "hello"));
        let json = serde_json::to_string(&index).unwrap();
        assert_eq!(json, r#"{"platform":{"overview":"hello"}}"#);
        assert_eq!(serde_json::to_string(&DocIndex::new()).unwrap(), "{}");
    }
}
