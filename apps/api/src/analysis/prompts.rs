// Prompt constants for résumé analysis.

/// System prompt for résumé analysis. Enforces JSON-only output.
pub const RESUME_ANALYSIS_SYSTEM: &str =
    "You are a career advisor for a professional competency certification body. \
    You read résumés and map the candidate's experience onto certification standards. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Résumé analysis prompt. Replace `{catalog}`, `{resume_text}` and `{catalog_rule}` before sending.
pub const RESUME_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyse the résumé below against the certification catalog.

CATALOG (one standard per line, "CODE | TITLE"):
{catalog}

RÉSUMÉ:
{resume_text}

Return a JSON object with this EXACT schema (no extra fields):
{
  "strengths": ["3 to 5 short statements of demonstrated competencies"],
  "opportunities": ["3 to 5 short statements of gaps a certification would close"],
  "recommended_standard": {"code": "EC0217.01", "title": "Impartición de cursos de formación del capital humano de manera presencial grupal"}
}

{catalog_rule}
Write strengths and opportunities in the same language as the résumé."#;
