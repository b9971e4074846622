// Shared prompt fragments. Each service that calls the LLM keeps its own prompts.rs
// next to it; this file holds the cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps recommendations inside the catalog that was sent with the prompt.
pub const CATALOG_ONLY_INSTRUCTION: &str = "\
    CRITICAL: Only recommend standards from the catalog listed in this prompt. \
    Use the exact code and title as written there. \
    Never invent a standard code.";
