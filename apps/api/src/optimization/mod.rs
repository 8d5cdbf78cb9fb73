// Resume optimization: one LLM rewrite per request, status tracked on the job card.
// All LLM calls go through llm_client.

pub mod handlers;
pub mod locks;
pub mod optimizer;
pub mod prompts;
pub mod summary;
