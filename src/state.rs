use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, RwLock};

use kluster_tweets::config::AppConfig;
use kluster_tweets::docs::DocIndex;
use kluster_tweets::llm::LlmClient;
use kluster_tweets::tweets::{GenerationSettings, TweetGenerator};

pub struct AppState {
    pub config: AppConfig,
    pub llm: Arc<LlmClient>,
    pub generator: TweetGenerator,
    /// Swapped wholesale after each successful scrape.
    pub index: RwLock<Arc<DocIndex>>,
    pub settings: RwLock<GenerationSettings>,
    /// Held for the whole scrape + index swap; one run at a time.
    pub scrape_lock: Mutex<()>,
}

impl AppState {
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.config.admin_ids.contains(&user_id)
    }

    pub async fn index(&self) -> Arc<DocIndex> {
        self.index.read().await.clone()
    }

    /// `None` while another scrape holds the lock.
    pub fn try_begin_scrape(&self) -> Option<MutexGuard<'_, ()>> {
        self.scrape_lock.try_lock().ok()
    }
}

pub type Context<'a> = poise::Context<'a, AppState, anyhow::Error>;
