mod config;
mod generate;
mod models;
mod scrape;
mod topics;

use crate::state::Context;

/// kluster.ai tweet generator
#[poise::command(
    slash_command,
    subcommands(
        "generate::generate",
        "topics::topics",
        "models::models",
        "scrape::scrape",
        "config::config"
    )
)]
pub async fn tweets(_ctx: Context<'_>) -> Result<(), anyhow::Error> {
    Ok(())
}

/// Send a message in Discord-safe chunks (max 1990 chars), splitting on
/// line or word boundaries where possible.
async fn send_chunked(ctx: &Context<'_>, text: &str) -> Result<(), anyhow::Error> {
    for chunk in split_chunks(text, 1990) {
        ctx.say(chunk).await?;
    }
    Ok(())
}

fn split_chunks(text: &str, max_len: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut remaining = text;
    while !remaining.is_empty() {
        let mut chunk_len = remaining.len().min(max_len);
        while !remaining.is_char_boundary(chunk_len) {
            chunk_len -= 1;
        }
        if chunk_len == 0 {
            chunk_len = remaining.chars().next().map_or(remaining.len(), char::len_utf8);
        }
        let split_at = if chunk_len < remaining.len() {
            remaining[..chunk_len]
                .rfind('\n')
                .or_else(|| remaining[..chunk_len].rfind(' '))
                .map(|i| i + 1)
                .unwrap_or(chunk_len)
        } else {
            chunk_len
        };
        chunks.push(&remaining[..split_at]);
        remaining = &remaining[split_at..];
    }
    chunks
}

/// Case-insensitive substring filter for autocomplete, capped at Discord's 25.
fn filter_choices<'a>(choices: impl IntoIterator<Item = &'a str>, partial: &str) -> Vec<String> {
    let partial = partial.to_lowercase();
    choices
        .into_iter()
        .filter(|c| c.to_lowercase().contains(&partial))
        .take(25)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_split_on_newlines_and_respect_char_boundaries() {
        let text = "line one\nline two\nline three";
        let chunks = split_chunks(text, 12);
        assert_eq!(chunks, vec!["line one\n", "line two\n", "line three"]);

        let emoji = "🚀🚀🚀";
        let chunks = split_chunks(emoji, 5);
        assert_eq!(chunks.concat(), emoji);
        assert!(chunks.iter().all(|c| c.len() <= 5));
    }

    #[test]
    fn autocomplete_filter_is_case_insensitive() {
        let got = filter_choices(["API Key Setup", "Models", "Batch Predictions"], "mod");
        assert_eq!(got, vec!["Models".to_string()]);
        assert_eq!(filter_choices(["a", "b"], "").len(), 2);
    }
}
