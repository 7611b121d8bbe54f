use crate::state::Context;

/// Configure generation defaults (admin only)
#[poise::command(slash_command, guild_only)]
pub async fn config(
    ctx: Context<'_>,
    #[description = "model | temperature | max_tokens | context_chars"] param: Option<String>,
    #[description = "New value"] value: Option<String>,
) -> Result<(), anyhow::Error> {
    if !ctx.data().is_admin(ctx.author().id.get()) {
        ctx.say("This command is admin-only.").await?;
        return Ok(());
    }

    match (param.as_deref(), value) {
        (None, _) => {
            let settings = ctx.data().settings.read().await;
            ctx.say(format!(
                "**Generation settings:**\n\
                 `model`: {}\n\
                 `temperature`: {}\n\
                 `max_tokens`: {}\n\
                 `context_chars`: {}",
                settings.model, settings.temperature, settings.max_tokens, settings.context_chars
            ))
            .await?;
        }
        (Some(key), Some(val)) => {
            let mut settings = ctx.data().settings.write().await;
            let reply = match key {
                "model" => {
                    settings.model = val.trim().to_string();
                    format!("`model` set to {}", settings.model)
                }
                "temperature" => match val.trim().parse::<f32>() {
                    Ok(t) if (0.0..=2.0).contains(&t) => {
                        settings.temperature = t;
                        format!("`temperature` set to {}", t)
                    }
                    _ => "`temperature` must be a number between 0 and 2".to_string(),
                },
                "max_tokens" => match val.trim().parse::<u32>() {
                    Ok(n) if n > 0 => {
                        settings.max_tokens = n;
                        format!("`max_tokens` set to {}", n)
                    }
                    _ => "`max_tokens` must be a positive integer".to_string(),
                },
                "context_chars" => match val.trim().parse::<usize>() {
                    Ok(n) => {
                        settings.context_chars = n;
                        format!("`context_chars` set to {}", n)
                    }
                    Err(_) => "`context_chars` must be a non-negative integer".to_string(),
                },
                _ => format!(
                    "Unknown param `{}`. Valid: `model`, `temperature`, `max_tokens`, `context_chars`",
                    key
                ),
            };
            drop(settings);
            ctx.say(reply).await?;
        }
        (Some(_), None) => {
            ctx.say("Provide both `param` and `value`. Example: `/tweets config temperature 0.9`")
                .await?;
        }
    }

    Ok(())
}
