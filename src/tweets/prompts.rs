//! Prompt templates for tweet generation.

/// Line that separates tweet candidates in the model output.
pub const TWEET_DELIMITER: &str = "---";

pub const DEFAULT_AUDIENCE: &str = "AI developers and engineering teams";
pub const DEFAULT_MISSION: &str = "Convert readers into kluster.ai users";

/// House-style reference tweets included in every prompt.
pub const TWEET_EXAMPLES: &[&str] = &[
    "🚨 Just launched:\nMeet Verify by http://kluster.ai: Out-of-the-box reliability for LLMs.\n\nA drop-in API that flags hallucinations, false claims, and low-quality outputs before they reach users or downstream tools.\n\nNo fine-tuning. No thresholds. No infra changes.\n🔗 https://kluster.ai/verify-by-kluster.ai",
    "Deploy AI without fear.\n\nA single hallucination can shatter customer trust or derail critical processes.\n\nEvery AI deployment faces the same critical question: “How do we know when our model gets it wrong?”\n\nIn our latest blog about Verify by http://kluster.ai, our new reliability tool for LLMs, we break down how it helps teams catch mistakes before they reach production.\n\nRead more here: https://bit.ly/45gbcRz",
    "The Hugging Face model you need isn’t hosted?\nhttp://kluster.ai lets you run it anyway.\n\nSpin up a private, production-ready endpoint in ~30 mins using Dedicated Deployments.\n\n🧠 https://docs.kluster.ai/get-started/dedicated-deployments/",
];

/// Everything a template needs. Empty optional fields fall back to defaults.
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub context: &'a str,
    pub topic: &'a str,
    pub subtopic: &'a str,
    pub tone: &'a str,
    pub audience: Option<&'a str>,
    pub example_tweet: Option<&'a str>,
    pub mission: Option<&'a str>,
}

/// Reasoning models get a `<think>` scaffold to fill in.
pub fn supports_thinking(model: &str) -> bool {
    model.to_lowercase().contains("deepseek-r1")
}

pub fn build_prompt(model: &str, input: &PromptInput<'_>) -> String {
    if supports_thinking(model) {
        prompt_with_thinking(input)
    } else {
        prompt_without_thinking(input)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn header(input: &PromptInput<'_>) -> String {
    // No delimiter lines in here; the parser splits the reply on them.
    let examples = TWEET_EXAMPLES
        .iter()
        .enumerate()
        .map(|(i, example)| format!("Example {}:\n{}", i + 1, example))
        .collect::<Vec<_>>()
        .join("\n\n");
    let mut out = format!(
        "You are kluster.ai's senior social media strategist. You write tweets that consistently drive signups and engagement.\n\n\
         DOCUMENTATION CONTEXT FOR {topic} - {subtopic}:\n{context}\n\n\
         TARGET AUDIENCE: {audience}\n\
         TONE: {tone}\n\
         MISSION: {mission}\n\n\
         KLUSTER.AI TWEET EXAMPLES TO FOLLOW:\n{examples}\n",
        topic = input.topic,
        subtopic = input.subtopic,
        context = input.context,
        audience = non_empty(input.audience).unwrap_or(DEFAULT_AUDIENCE),
        tone = input.tone,
        mission = non_empty(input.mission).unwrap_or(DEFAULT_MISSION),
        examples = examples,
    );
    if let Some(example) = non_empty(input.example_tweet) {
        out.push_str(&format!(
            "\nSTYLE REFERENCE FROM THE USER (match its voice, not its content):\n{}\n",
            example
        ));
    }
    out.push_str(
        "\nTake all these examples into consideration to craft the perfect tweet.\n\
         Try to reference something from the docs passed as context.\n",
    );
    out
}

fn output_rules() -> String {
    format!(
        "OUTPUT FORMAT:\n\
         Write exactly 3 different tweet options.\n\
         Separate the options with a line containing only {d}\n\
         Do not number or label the options. Output only the tweet texts and the {d} separators.",
        d = TWEET_DELIMITER
    )
}

fn prompt_with_thinking(input: &PromptInput<'_>) -> String {
    let preview: String = input.context.chars().take(500).collect();
    format!(
        "{header}\n\
         <think>\n\
         Let me analyze these kluster.ai tweet structures:\n\n\
         1. ATTENTION GRABBER: Hooks the reader with urgency, novelty, or a bold claim.\n\
         2. PRODUCT INTRODUCTION: Clearly introduces a kluster.ai capability or update.\n\
         3. BENEFIT EXPLANATION: Describes what it does and why it matters, referencing real pain points.\n\
         4. FRICTION REMOVAL: \"No [pain point]. No [pain point]. No [pain point].\" - Removes objections.\n\
         5. CALL TO ACTION: Clean link with branded URL or resource.\n\n\
         Now I need to extract from the documentation context:\n\
         - What specific capability/feature should I highlight?\n\
         - What pain points does this solve that I can negate with \"No X. No Y. No Z.\"?\n\
         - What's the core value proposition that would stop someone scrolling?\n\
         - How does this fit kluster.ai's positioning as reliable AI infrastructure?\n\n\
         Looking at the documentation: {preview}...\n\n\
         I should craft this to match kluster.ai's voice - direct, technical but accessible, benefit-focused.\n\
         </think>\n\n\
         Using the kluster.ai template structure above, create tweets about {subtopic} that:\n\n\
         1. Start with an attention-grabbing opener (emoji or bold statement)\n\
         2. Introduce the kluster.ai capability with clear value prop\n\
         3. Explain the benefit using insights from the documentation\n\
         4. Remove friction with \"No X. No Y. No Z.\" format using real pain points from the docs\n\
         5. End with a clear call to action\n\n\
         CRITICAL REQUIREMENTS:\n\
         - Extract specific details from the documentation context provided\n\
         - Use kluster.ai's confident, technical tone\n\
         - Focus on the exact capability described in the docs\n\
         - Maximum 280 characters per tweet\n\
         - Include \"http://kluster.ai\" naturally in the messaging\n\n\
         {rules}",
        header = header(input),
        preview = preview,
        subtopic = input.subtopic,
        rules = output_rules(),
    )
}

fn prompt_without_thinking(input: &PromptInput<'_>) -> String {
    format!(
        "{header}\n\
         TEMPLATE STRUCTURE ANALYSIS:\n\
         1. ATTENTION: Hooks the reader with urgency, novelty, or a bold claim.\n\
         2. INTRO: Clearly introduces a kluster.ai capability or update.\n\
         3. BENEFIT: Explains capability and impact based on documentation context.\n\
         4. FRICTION REMOVAL: \"No [pain]. No [pain]. No [pain].\"\n\
         5. CTA: Clean branded link or resource.\n\n\
         YOUR TASK:\n\
         Create tweets about {subtopic} using this structure.\n\n\
         INSTRUCTIONS:\n\
         - Mine the documentation context for specific technical details\n\
         - Identify real pain points this kluster.ai capability solves\n\
         - Use the \"No X. No Y. No Z.\" pattern with actual friction points from docs\n\
         - Include \"http://kluster.ai\" naturally\n\
         - Match kluster.ai's confident, technical tone\n\
         - Stay under 280 characters per tweet\n\
         - Focus on business impact, not just features\n\n\
         Extract insights directly from the provided documentation context. Do not add generic claims not supported by the docs.\n\n\
         {rules}",
        header = header(input),
        subtopic = input.subtopic,
        rules = output_rules(),
    )
}
