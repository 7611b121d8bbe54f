use std::sync::Arc;

use tracing::{error, info};

use kluster_tweets::docs::{load_index, scrape_run};

use crate::state::Context;

/// Re-scrape the kluster.ai docs and replace the cache (admin only)
#[poise::command(slash_command, guild_only)]
pub async fn scrape(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    if !ctx.data().is_admin(ctx.author().id.get()) {
        ctx.say("This command is admin-only.").await?;
        return Ok(());
    }

    let Some(_running) = ctx.data().try_begin_scrape() else {
        ctx.say("A scrape is already running, try again when it finishes.")
            .await?;
        return Ok(());
    };

    ctx.defer().await?;
    info!(user = %ctx.author().name, "scrape requested");

    let config = &ctx.data().config;
    let scrape_config = config.scrape_config();

    let report = match scrape_run(&scrape_config, &config.cache_path).await {
        Ok(report) => report,
        Err(e) => {
            error!("scrape run failed: {}", e);
            ctx.say(format!("Scrape failed, previous cache kept: {}", e))
                .await?;
            return Ok(());
        }
    };

    let index = load_index(&config.cache_path).await?;
    let pages = index.len();
    *ctx.data().index.write().await = Arc::new(index);

    let mut out = format!(
        "Scraped **{}** pages ({} skipped) in {:.1}s → {} indexed entries\nDigest: `{}`",
        report.succeeded,
        report.skipped,
        report.elapsed.as_secs_f64(),
        pages,
        &report.digest[..12]
    );
    for failure in report.failures.iter().take(10) {
        out.push_str(&format!("\n- skipped {}: {}", failure.url, failure.reason));
    }
    if report.failures.len() > 10 {
        out.push_str(&format!("\n- …and {} more", report.failures.len() - 10));
    }

    super::send_chunked(&ctx, &out).await
}
