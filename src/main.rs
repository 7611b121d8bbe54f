mod commands;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use poise::serenity_prelude as serenity;
use poise::{Framework, FrameworkOptions};
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn, Level};

use kluster_tweets::config::AppConfig;
use kluster_tweets::docs::{load_index, scrape_run, DocIndex};
use kluster_tweets::llm::{LlmClient, FALLBACK_MODELS};
use kluster_tweets::tweets::{
    GenerationSettings, TweetGenerator, TweetRequest, DEFAULT_TONE, TWEET_MAX_CHARS,
};
use state::AppState;

#[derive(Parser)]
#[command(name = "kluster-tweets", version, about = "Documentation-grounded tweet generator for kluster.ai")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the documentation pages and replace the cache file
    Scrape {
        /// Cache file path (defaults to DOCS_CACHE_PATH)
        #[arg(long)]
        cache: Option<PathBuf>,
    },
    /// List cached topics and subtopics
    Topics,
    /// List available text models
    Models,
    /// Generate 3 tweet options for a cached topic
    Generate {
        #[arg(long)]
        topic: String,
        #[arg(long)]
        subtopic: String,
        #[arg(long, default_value = DEFAULT_TONE)]
        tone: String,
        #[arg(long)]
        audience: Option<String>,
        #[arg(long)]
        example: Option<String>,
        #[arg(long)]
        mission: Option<String>,
        #[arg(long)]
        model: Option<String>,
    },
    /// Run the Discord bot (default)
    Bot,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let config = AppConfig::from_env()?;

    match cli.command.unwrap_or(Command::Bot) {
        Command::Scrape { cache } => run_scrape(&config, cache).await,
        Command::Topics => run_topics(&config).await,
        Command::Models => run_models(&config).await,
        Command::Generate {
            topic,
            subtopic,
            tone,
            audience,
            example,
            mission,
            model,
        } => {
            let request = TweetRequest {
                topic,
                subtopic,
                tone,
                audience,
                example_tweet: example,
                mission,
                model,
            };
            run_generate(&config, request).await
        }
        Command::Bot => run_bot(config).await,
    }
}

async fn run_scrape(config: &AppConfig, cache: Option<PathBuf>) -> anyhow::Result<()> {
    let cache_path = cache.unwrap_or_else(|| config.cache_path.clone());
    let report = match scrape_run(&config.scrape_config(), &cache_path).await {
        Ok(report) => report,
        Err(e) => {
            error!("scrape run failed: {}", e);
            return Err(e.into());
        }
    };

    println!(
        "Scraped {} pages, skipped {} in {:.2}s",
        report.succeeded,
        report.skipped,
        report.elapsed.as_secs_f64()
    );
    for failure in &report.failures {
        println!("  skipped {} ({} / {}): {}", failure.url, failure.topic, failure.subtopic, failure.reason);
    }
    println!("Cache: {} (blake3 {})", report.cache_path.display(), report.digest);
    Ok(())
}

async fn run_topics(config: &AppConfig) -> anyhow::Result<()> {
    let index = load_index(&config.cache_path).await?;
    if index.is_empty() {
        println!("No docs cached at {}. Run `kluster-tweets scrape` first.", config.cache_path.display());
        return Ok(());
    }
    for topic in index.topics() {
        println!("{}", topic);
        for subtopic in index.subtopics(topic) {
            println!("  {}", subtopic);
        }
    }
    Ok(())
}

async fn run_models(config: &AppConfig) -> anyhow::Result<()> {
    let llm = LlmClient::new(&config.llm)?;
    let models = match llm.list_models().await {
        Ok(models) if !models.is_empty() => models,
        Ok(_) => FALLBACK_MODELS.iter().map(|m| m.to_string()).collect(),
        Err(e) => {
            warn!("model listing failed, using fallback list: {:#}", e);
            FALLBACK_MODELS.iter().map(|m| m.to_string()).collect()
        }
    };
    for model in models {
        let marker = if model == config.default_model { " (default)" } else { "" };
        println!("{}{}", model, marker);
    }
    Ok(())
}

async fn run_generate(config: &AppConfig, request: TweetRequest) -> anyhow::Result<()> {
    if config.llm.api_key.is_none() {
        warn!("KLUSTER_API_KEY is not set; the request will be sent without credentials");
    }

    let index = load_index(&config.cache_path).await?;
    let generator = TweetGenerator::new(Arc::new(LlmClient::new(&config.llm)?));
    let settings = GenerationSettings {
        model: config.default_model.clone(),
        ..GenerationSettings::default()
    };

    let batch = generator.generate(&index, &request, &settings).await?;
    if !batch.context_found {
        println!("(no cached docs for {} / {}; used a generic description)", request.topic, request.subtopic);
    }
    for (i, tweet) in batch.tweets.iter().enumerate() {
        println!("Option {} [{}/{} chars]:\n{}\n", i + 1, tweet.chars().count(), TWEET_MAX_CHARS, tweet);
    }
    Ok(())
}

async fn run_bot(config: AppConfig) -> anyhow::Result<()> {
    let token = config
        .discord_token
        .clone()
        .context("DISCORD_TOKEN required to run the bot")?;
    let guild_id = config.discord_guild_id.map(serenity::GuildId::new);

    let index = match load_index(&config.cache_path).await {
        Ok(index) => index,
        Err(e) => {
            warn!("ignoring unreadable doc cache: {}", e);
            DocIndex::default()
        }
    };
    info!(pages = index.len(), path = %config.cache_path.display(), "doc cache loaded");

    let llm = Arc::new(LlmClient::new(&config.llm)?);
    info!("LLM client initialized");

    if !config.admin_ids.is_empty() {
        info!(count = config.admin_ids.len(), "Admin users configured");
    }

    let settings = GenerationSettings {
        model: config.default_model.clone(),
        ..GenerationSettings::default()
    };

    let app_state = AppState {
        generator: TweetGenerator::new(llm.clone()),
        llm,
        index: RwLock::new(Arc::new(index)),
        settings: RwLock::new(settings),
        scrape_lock: Mutex::new(()),
        config,
    };

    let intents = serenity::GatewayIntents::GUILDS;

    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: vec![commands::tweets()],
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot connected as: {} ({})", ready.user.name, ready.user.id);

                let commands = &framework.options().commands;
                for cmd in commands {
                    info!("  /{} ({} subcommands)", cmd.name, cmd.subcommands.len());
                }

                if let Some(gid) = guild_id {
                    info!("Registering to guild {} (instant)", gid);
                    poise::builtins::register_in_guild(ctx, &framework.options().commands, gid)
                        .await?;
                } else {
                    info!("Registering globally (up to 1 hour delay)");
                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                }

                Ok(app_state)
            })
        })
        .build();

    info!("Starting tweet generator bot...");

    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
    }

    Ok(())
}
