// Résumé analysis: intake (pasted text or uploaded file), archival, and the LLM call
// that maps a résumé onto the standards catalog.
// All LLM calls go through llm_client.

pub mod analyzer;
pub mod handlers;
pub mod intake;
pub mod prompts;
