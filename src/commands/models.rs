use tracing::warn;

use kluster_tweets::llm::FALLBACK_MODELS;

use crate::state::Context;

/// List available text models
#[poise::command(slash_command, guild_only)]
pub async fn models(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    ctx.defer().await?;

    let models = match ctx.data().llm.list_models().await {
        Ok(models) if !models.is_empty() => models,
        Ok(_) => FALLBACK_MODELS.iter().map(|m| m.to_string()).collect(),
        Err(e) => {
            warn!("model listing failed, using fallback list: {:#}", e);
            FALLBACK_MODELS.iter().map(|m| m.to_string()).collect()
        }
    };

    let current = ctx.data().settings.read().await.model.clone();
    let mut output = String::from("**Available text models**\n");
    for model in &models {
        let marker = if *model == current { " (default)" } else { "" };
        output.push_str(&format!("- `{}`{}\n", model, marker));
    }

    super::send_chunked(&ctx, &output).await
}
