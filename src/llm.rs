use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.kluster.ai/v1";
pub const DEFAULT_MODEL: &str = "deepseek-ai/DeepSeek-V3-0324";

/// Used when the models endpoint is unreachable.
pub const FALLBACK_MODELS: &[&str] = &[
    "deepseek-ai/DeepSeek-V3-0324",
    "klusterai/Meta-Llama-3.1-8B-Instruct-Turbo",
    "klusterai/Meta-Llama-3.3-70B-Instruct-Turbo",
];

/// Model ids containing any of these are not chat text models.
const NON_TEXT_MODEL_KEYWORDS: &[&str] = &[
    "stable-diffusion",
    "sdxl",
    "flux",
    "whisper",
    "audio",
    "image",
    "vision",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Per-request generation parameters.
#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: 120,
        }
    }
}

/// OpenAI-compatible chat completions client.
pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    /// API root with any `/chat/completions` suffix removed and `/v1` ensured.
    fn api_root(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let base = base.strip_suffix("/chat/completions").unwrap_or(base);
        if base.ends_with("/v1") {
            base.to_string()
        } else {
            format!("{}/v1", base)
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_root())
    }

    fn models_endpoint(&self) -> String {
        format!("{}/models", self.api_root())
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.header("Authorization", format!("Bearer {}", key)),
            None => req,
        }
    }

    /// Non-streaming chat completion.
    pub async fn chat(&self, messages: &[Message], options: &ChatOptions) -> Result<String> {
        let body = serde_json::json!({
            "model": options.model,
            "messages": messages,
            "temperature": options.temperature,
            "max_tokens": options.max_tokens,
        });

        let req = self.authorize(self.client.post(self.endpoint()).json(&body));
        let resp = req.send().await.context("LLM request failed")?;
        let status = resp.status();
        let text = resp.text().await.context("Failed to read LLM response")?;
        if !status.is_success() {
            bail!("LLM API returned {}: {}", status, text.trim());
        }

        let json: serde_json::Value =
            serde_json::from_str(&text).context("Failed to parse LLM JSON")?;

        // choices[0].message.content may be null
        let content = json["choices"]
            .get(0)
            .and_then(|c| c["message"]["content"].as_str())
            .unwrap_or("")
            .to_string();

        Ok(content)
    }

    /// Available text model ids, sorted.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let req = self.authorize(self.client.get(self.models_endpoint()));
        let resp = req.send().await.context("Model listing request failed")?;
        let status = resp.status();
        if !status.is_success() {
            bail!("Model listing returned {}", status);
        }
        let json: serde_json::Value = resp.json().await.context("Failed to parse model list")?;

        let mut models: Vec<String> = json["data"]
            .as_array()
            .map(|data| {
                data.iter()
                    .filter_map(|m| m["id"].as_str())
                    .filter(|id| is_text_model(id))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        models.sort();
        Ok(models)
    }
}

pub fn is_text_model(id: &str) -> bool {
    let lower = id.to_lowercase();
    !NON_TEXT_MODEL_KEYWORDS.iter().any(|k| lower.contains(k))
}
