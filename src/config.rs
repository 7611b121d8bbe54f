use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::docs::cache::DEFAULT_CACHE_PATH;
use crate::docs::fetch::{DEFAULT_MAX_CONCURRENT, DEFAULT_USER_AGENT, MAX_CONCURRENT_CAP};
use crate::docs::sources::{kluster_sources, DEFAULT_DOCS_BASE_URL};
use crate::docs::ScrapeConfig;
use crate::llm::{LlmConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Process configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub default_model: String,
    pub docs_base_url: String,
    pub cache_path: PathBuf,
    pub max_concurrent: usize,
    pub scrape_timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    pub discord_token: Option<String>,
    pub discord_guild_id: Option<u64>,
    pub admin_ids: HashSet<u64>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let _ = dotenv::dotenv();

        let llm = LlmConfig {
            base_url: var_or("LLM_BASE_URL", DEFAULT_BASE_URL),
            api_key: var_opt("KLUSTER_API_KEY"),
            timeout_secs: parse_or("LLM_TIMEOUT_SECS", 120)?,
        };

        let admin_ids = var_opt("ADMIN_USER_IDS")
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| s.trim().parse::<u64>().ok())
            .collect();

        let max_concurrent = parse_or("SCRAPE_MAX_CONCURRENT", DEFAULT_MAX_CONCURRENT)?;
        if !(1..=MAX_CONCURRENT_CAP).contains(&max_concurrent) {
            bail!(
                "SCRAPE_MAX_CONCURRENT must be between 1 and {}, got {}",
                MAX_CONCURRENT_CAP,
                max_concurrent
            );
        }

        Ok(Self {
            llm,
            default_model: var_or("LLM_MODEL", DEFAULT_MODEL),
            docs_base_url: var_or("DOCS_BASE_URL", DEFAULT_DOCS_BASE_URL),
            cache_path: PathBuf::from(var_or("DOCS_CACHE_PATH", DEFAULT_CACHE_PATH)),
            max_concurrent,
            scrape_timeout: Duration::from_secs(parse_or("SCRAPE_TIMEOUT_SECS", 30)?),
            connect_timeout: Duration::from_secs(parse_or("SCRAPE_CONNECT_TIMEOUT_SECS", 10)?),
            user_agent: var_or("SCRAPE_USER_AGENT", DEFAULT_USER_AGENT),
            discord_token: var_opt("DISCORD_TOKEN"),
            discord_guild_id: var_opt("DISCORD_GUILD_ID")
                .map(|s| s.parse::<u64>())
                .transpose()
                .context("DISCORD_GUILD_ID must be a numeric id")?,
            admin_ids,
        })
    }

    /// Scrape configuration over the default kluster.ai catalog.
    pub fn scrape_config(&self) -> ScrapeConfig {
        ScrapeConfig {
            sources: kluster_sources(&self.docs_base_url),
            max_concurrent: self.max_concurrent,
            request_timeout: self.scrape_timeout,
            connect_timeout: self.connect_timeout,
            user_agent: self.user_agent.clone(),
        }
    }
}

fn var_opt(key: &str) -> Option<String> {
    dotenv::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    var_opt(key).unwrap_or_else(|| default.to_string())
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var_opt(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        None => Ok(default),
    }
}
