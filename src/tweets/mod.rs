//! Tweet generation from cached documentation context.

pub mod prompts;

use std::sync::Arc;

use tracing::{debug, info};

use crate::docs::DocIndex;
use crate::llm::{ChatOptions, LlmClient, Message, DEFAULT_MODEL};
use prompts::{build_prompt, PromptInput, TWEET_DELIMITER};

pub const TWEET_COUNT: usize = 3;
pub const TWEET_MAX_CHARS: usize = 280;

pub const TONE_OPTIONS: &[&str] = &[
    "Professional & Trustworthy",
    "Technical & Detailed",
    "Problem-Focused & Urgent",
    "Educational & Helpful",
    "Confident & Bold",
];

pub const DEFAULT_TONE: &str = "Professional & Trustworthy";

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation request failed: {0:#}")]
    Upstream(#[from] anyhow::Error),
    #[error("expected {expected} tweets in model output, found {found}")]
    Malformed { expected: usize, found: usize },
}

/// User-facing generation parameters.
#[derive(Debug, Clone)]
pub struct TweetRequest {
    pub topic: String,
    pub subtopic: String,
    pub tone: String,
    pub audience: Option<String>,
    pub example_tweet: Option<String>,
    pub mission: Option<String>,
    /// Overrides the generator's default model.
    pub model: Option<String>,
}

impl TweetRequest {
    pub fn new(topic: impl Into<String>, subtopic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            subtopic: subtopic.into(),
            tone: DEFAULT_TONE.to_string(),
            audience: None,
            example_tweet: None,
            mission: None,
            model: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TweetBatch {
    pub tweets: [String; TWEET_COUNT],
    pub model: String,
    /// False when the cache had nothing for the requested topic/subtopic.
    pub context_found: bool,
}

/// Tunable generation defaults (admins can change them at runtime).
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Characters of cached doc text passed as context.
    pub context_chars: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 600,
            context_chars: 400,
        }
    }
}

pub struct TweetGenerator {
    llm: Arc<LlmClient>,
}

impl TweetGenerator {
    pub fn new(llm: Arc<LlmClient>) -> Self {
        Self { llm }
    }

    /// Generate exactly three candidate tweets for `request`.
    ///
    /// The index is only read. A missing topic/subtopic is not an error; the
    /// prompt gets a generic placeholder instead of doc text.
    pub async fn generate(
        &self,
        index: &DocIndex,
        request: &TweetRequest,
        settings: &GenerationSettings,
    ) -> Result<TweetBatch, GenerationError> {
        let model = request
            .model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(&settings.model)
            .to_string();

        let (context, context_found) =
            lookup_context(index, &request.topic, &request.subtopic, settings.context_chars);

        info!(
            topic = %request.topic,
            subtopic = %request.subtopic,
            model = %model,
            tone = %request.tone,
            context_found,
            "generating tweets"
        );

        let prompt = build_prompt(
            &model,
            &PromptInput {
                context: &context,
                topic: &request.topic,
                subtopic: &request.subtopic,
                tone: &request.tone,
                audience: request.audience.as_deref(),
                example_tweet: request.example_tweet.as_deref(),
                mission: request.mission.as_deref(),
            },
        );
        debug!(chars = prompt.chars().count(), "prompt built:\n{}", prompt);

        let options = ChatOptions {
            model: model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        };
        let raw = self.llm.chat(&[Message::user(prompt)], &options).await?;

        let tweets = parse_tweets(&raw)?;
        Ok(TweetBatch {
            tweets,
            model,
            context_found,
        })
    }
}

/// Cached text for the key, truncated to `max_chars`, or a placeholder.
pub fn lookup_context(
    index: &DocIndex,
    topic: &str,
    subtopic: &str,
    max_chars: usize,
) -> (String, bool) {
    match index.get(topic, subtopic) {
        Some(text) => (truncate_chars(text, max_chars), true),
        None => (
            format!("kluster.ai's {} capabilities", subtopic.to_lowercase()),
            false,
        ),
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Split model output into exactly [`TWEET_COUNT`] candidates.
pub fn parse_tweets(raw: &str) -> Result<[String; TWEET_COUNT], GenerationError> {
    let visible = strip_think(raw);

    let mut blocks: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in visible.lines() {
        if line.trim() == TWEET_DELIMITER {
            blocks.push(current.join("\n"));
            current.clear();
        } else {
            current.push(line);
        }
    }
    blocks.push(current.join("\n"));

    let tweets: Vec<String> = blocks
        .iter()
        .map(|b| clean_candidate(b))
        .filter(|t| !t.is_empty())
        .take(TWEET_COUNT)
        .collect();

    let found = tweets.len();
    tweets.try_into().map_err(|_| GenerationError::Malformed {
        expected: TWEET_COUNT,
        found,
    })
}

/// Drop reasoning output. An unterminated `<think>` hides everything after it.
fn strip_think(raw: &str) -> String {
    let mut out = String::new();
    let mut rest = raw;
    while let Some(start) = rest.find("<think>") {
        out.push_str(&rest[..start]);
        match rest[start..].find("</think>") {
            Some(end) => rest = &rest[start + end + "</think>".len()..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

fn clean_candidate(block: &str) -> String {
    let mut text = block.trim();
    for label in ["Tweet", "Option"] {
        if let Some(after) = text.strip_prefix(label) {
            let after = after.trim_start_matches(|c: char| c.is_ascii_digit() || c == ' ' || c == '#');
            if let Some(body) = after.strip_prefix(':') {
                text = body.trim();
            }
        }
    }
    let text = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);
    text.trim().to_string()
}
