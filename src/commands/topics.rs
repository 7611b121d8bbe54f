use crate::state::Context;

/// List cached documentation topics and subtopics
#[poise::command(slash_command, guild_only)]
pub async fn topics(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    let index = ctx.data().index().await;

    if index.is_empty() {
        ctx.say("No docs cached yet. An admin can run `/tweets scrape` to fetch them.")
            .await?;
        return Ok(());
    }

    let mut output = format!("**Cached docs** ({} pages)\n\n", index.len());
    for topic in index.topics() {
        output.push_str(&format!("**{}**\n", topic));
        for subtopic in index.subtopics(topic) {
            let chars = index
                .get(topic, subtopic)
                .map(|t| t.chars().count())
                .unwrap_or(0);
            output.push_str(&format!("  - {} ({} chars)\n", subtopic, chars));
        }
        output.push('\n');
    }

    super::send_chunked(&ctx, &output).await
}
