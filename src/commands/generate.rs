use tracing::{info, warn};

use kluster_tweets::tweets::{TweetRequest, DEFAULT_TONE, TONE_OPTIONS, TWEET_MAX_CHARS};

use super::{filter_choices, send_chunked};
use crate::state::Context;

/// Generate 3 tweet options from the cached docs
#[poise::command(slash_command, guild_only)]
pub async fn generate(
    ctx: Context<'_>,
    #[description = "Documentation topic"]
    #[autocomplete = "autocomplete_topic"]
    topic: String,
    #[description = "Subtopic within the topic"]
    #[autocomplete = "autocomplete_subtopic"]
    subtopic: String,
    #[description = "Tone/style"]
    #[autocomplete = "autocomplete_tone"]
    tone: Option<String>,
    #[description = "Target audience, e.g. ML engineers"] audience: Option<String>,
    #[description = "Example tweet for style reference"] example: Option<String>,
    #[description = "Specific mission/focus"] mission: Option<String>,
    #[description = "Model id override"] model: Option<String>,
) -> Result<(), anyhow::Error> {
    ctx.defer().await?;

    let request = TweetRequest {
        topic,
        subtopic,
        tone: tone.unwrap_or_else(|| DEFAULT_TONE.to_string()),
        audience,
        example_tweet: example,
        mission,
        model,
    };

    info!(
        user = %ctx.author().name,
        topic = %request.topic,
        subtopic = %request.subtopic,
        "tweet generation requested"
    );

    let index = ctx.data().index().await;
    let settings = ctx.data().settings.read().await.clone();

    let batch = match ctx
        .data()
        .generator
        .generate(&index, &request, &settings)
        .await
    {
        Ok(batch) => batch,
        Err(e) => {
            warn!("tweet generation failed: {}", e);
            ctx.say(format!("Tweet generation failed: {}", e)).await?;
            return Ok(());
        }
    };

    let mut out = format!(
        "**Tweets: {} → {}**\nModel: `{}` | Tone: {}\n",
        request.topic, request.subtopic, batch.model, request.tone
    );
    if !batch.context_found {
        out.push_str("_No cached docs for this subtopic; generated from a generic description._\n");
    }
    for (i, tweet) in batch.tweets.iter().enumerate() {
        let chars = tweet.chars().count();
        let marker = if chars <= TWEET_MAX_CHARS { "" } else { " (too long)" };
        out.push_str(&format!(
            "\n**Option {}:**\n{}\n`{}/{} chars`{}\n",
            i + 1,
            tweet,
            chars,
            TWEET_MAX_CHARS,
            marker
        ));
    }

    send_chunked(&ctx, &out).await
}

async fn autocomplete_topic(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let index = ctx.data().index().await;
    filter_choices(index.topics(), partial)
}

async fn autocomplete_subtopic(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let index = ctx.data().index().await;
    let mut subtopics: Vec<&str> = index.entries().map(|(_, sub, _)| sub).collect();
    subtopics.sort_unstable();
    subtopics.dedup();
    filter_choices(subtopics, partial)
}

async fn autocomplete_tone(_ctx: Context<'_>, partial: &str) -> Vec<String> {
    filter_choices(TONE_OPTIONS.iter().copied(), partial)
}
