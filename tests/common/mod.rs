#![allow(dead_code)]

use std::env;
use std::sync::Mutex;

use kluster_tweets::docs::{DocIndex, DocPage};

/// Every variable `AppConfig::from_env` reads.
const CONFIG_VARS: &[&str] = &[
    "KLUSTER_API_KEY",
    "LLM_BASE_URL",
    "LLM_MODEL",
    "LLM_TIMEOUT_SECS",
    "DOCS_BASE_URL",
    "DOCS_CACHE_PATH",
    "SCRAPE_MAX_CONCURRENT",
    "SCRAPE_TIMEOUT_SECS",
    "SCRAPE_CONNECT_TIMEOUT_SECS",
    "SCRAPE_USER_AGENT",
    "DISCORD_TOKEN",
    "DISCORD_GUILD_ID",
    "ADMIN_USER_IDS",
];

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub struct EnvGuard {
    _lock: std::sync::MutexGuard<'static, ()>,
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        clear_env();
    }
}

pub fn with_env<'a>(vars: impl IntoIterator<Item = (&'a str, &'a str)>) -> EnvGuard {
    let guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    for (k, v) in vars {
        env::set_var(k, v);
    }
    EnvGuard { _lock: guard }
}

fn clear_env() {
    for key in CONFIG_VARS {
        env::remove_var(key);
    }
}

pub fn html_page(body: &str) -> String {
    format!(
        "<html><head><title>Docs</title></head><body><nav>Home | Docs</nav>{}<footer>© kluster.ai</footer></body></html>",
        body
    )
}

pub fn index_with(entries: &[(&str, &str, &str)]) -> DocIndex {
    let mut index = DocIndex::new();
    for (topic, subtopic, text) in entries {
        index.insert(DocPage {
            url: format!("https://docs.kluster.ai/{}", subtopic),
            topic: topic.to_string(),
            subtopic: subtopic.to_string(),
            text: text.to_string(),
        });
    }
    index
}
