// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to prompts whose answer is used verbatim as document text.
pub const PLAIN_TEXT_ONLY: &str =
    "without any additional commentary. Do not wrap the text in code fences or markdown.";
