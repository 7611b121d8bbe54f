//! Static catalog of kluster.ai documentation pages.

use url::Url;

use super::types::DocSource;

pub const DEFAULT_DOCS_BASE_URL: &str = "https://docs.kluster.ai";

const KNOWN_PATHS: &[&str] = &[
    "get-started/get-api-key/",
    "get-started/models/",
    "get-started/openai-compatibility/",
    "get-started/start-building/",
    "get-started/integrations/",
    "get-started/dedicated-deployments/",
    "get-started/fine-tuning/",
    "get-started/fine-tuning/overview/",
    "get-started/fine-tuning/api/",
    "get-started/verify/",
    "get-started/verify/overview/",
    "get-started/verify/reliability/",
    "get-started/verify/reliability/overview/",
    "get-started/verify/reliability/dedicated-api/",
    "api-reference/",
    "tutorials/",
    "tutorials/text-classification/",
    "tutorials/sentiment-analysis/",
    "tutorials/keyword-extraction/",
    "tutorials/image-analysis/",
    "tutorials/llm-evaluation/",
    "tutorials/prompt-engineering/",
    "tutorials/batch-predictions/",
    "tutorials/fine-tuning/",
    "tutorials/tool-integrations/",
    "tutorials/uploading-large-files/",
    "tutorials/reliability-check/",
];

/// Path segments with hand-picked display names.
const SPECIAL_NAMES: &[(&str, &str)] = &[
    ("api-key", "API Key Setup"),
    ("openai-compatibility", "OpenAI Compatibility"),
    ("start-building", "Start Building"),
    ("dedicated-deployments", "Dedicated Deployments"),
    ("reliability", "Reliability Checks"),
    ("dedicated-api", "Dedicated API"),
    ("text-classification", "Text Classification"),
    ("sentiment-analysis", "Sentiment Analysis"),
    ("keyword-extraction", "Keyword Extraction"),
    ("image-analysis", "Image Analysis"),
    ("llm-evaluation", "LLM Evaluation"),
    ("prompt-engineering", "Prompt Engineering"),
    ("batch-predictions", "Batch Predictions"),
    ("tool-integrations", "Tool Integrations"),
    ("uploading-large-files", "Large File Upload"),
    ("reliability-check", "Reliability Check"),
];

/// Segments that describe a section rather than a page.
const GENERIC_LEAVES: &[&str] = &["overview", "api"];

/// The default source list rooted at `base_url`, in catalog order.
///
/// Several paths map to the same (topic, subtopic); the later one wins when
/// the index is built.
pub fn kluster_sources(base_url: &str) -> Vec<DocSource> {
    let base = base_url.trim_end_matches('/');
    KNOWN_PATHS
        .iter()
        .filter_map(|path| DocSource::from_url(&format!("{}/{}", base, path)))
        .collect()
}

impl DocSource {
    /// Derive topic and subtopic names from a documentation URL path.
    /// Returns `None` for unparseable URLs or an empty path.
    pub fn from_url(url: &str) -> Option<Self> {
        let parsed = Url::parse(url).ok()?;
        let path = parsed.path();
        let parts: Vec<&str> = path
            .split('/')
            .filter(|p| !p.is_empty() && *p != "docs")
            .collect();
        let first = parts.first()?;

        let topic = if path.contains("get-started") {
            if path.contains("verify") {
                "🛡️ Verify & Reliability".to_string()
            } else if path.contains("fine-tuning") {
                "🎯 Fine-tuning".to_string()
            } else {
                "🚀 Getting Started".to_string()
            }
        } else if path.contains("api-reference") {
            "⚙️ API Reference".to_string()
        } else if path.contains("tutorials") {
            "📈 Use Cases & Tutorials".to_string()
        } else {
            format!("🛠️ {}", title_case(first))
        };

        let subtopic = if parts.len() > 1 {
            let last = parts[parts.len() - 1];
            let raw = if GENERIC_LEAVES.contains(&last) {
                parts[parts.len() - 2]
            } else {
                last
            };
            SPECIAL_NAMES
                .iter()
                .find(|(key, _)| *key == raw)
                .map(|(_, name)| name.to_string())
                .unwrap_or_else(|| title_case(raw))
        } else {
            strip_emoji_prefix(&topic).to_string()
        };

        Some(Self::new(topic, subtopic, url))
    }
}

/// "fine-tuning" -> "Fine Tuning"
fn title_case(slug: &str) -> String {
    slug.split('-')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn strip_emoji_prefix(topic: &str) -> &str {
    topic.split_once(' ').map(|(_, rest)| rest).unwrap_or(topic)
}
