use serde::{Deserialize, Serialize};

use crate::business::prompts::SALES_CHAT_SYSTEM_TEMPLATE;
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{ChatRole, ChatTurn, LlmClient};
use crate::models::catalog::Standard;

pub const MAX_CHAT_TURNS: usize = 40;
pub const MAX_TURN_CHARS: usize = 4_000;

#[derive(Debug, Deserialize)]
pub struct SalesChatRequest {
    pub messages: Vec<ChatTurn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReply {
    pub reply: String,
    #[serde(default)]
    pub qualified: bool,
    #[serde(default)]
    pub recommended_plan: Option<String>,
}

/// Checks the transcript before it is sent anywhere.
pub fn validate_transcript(turns: &[ChatTurn]) -> Result<(), AppError> {
    let last = turns
        .last()
        .ok_or_else(|| AppError::Validation("At least one message is required".to_string()))?;
    if last.role != ChatRole::User {
        return Err(AppError::Validation(
            "The last message must come from the user".to_string(),
        ));
    }
    if turns.len() > MAX_CHAT_TURNS {
        return Err(AppError::Validation(format!(
            "Conversations are limited to {MAX_CHAT_TURNS} messages"
        )));
    }
    if turns.iter().any(|t| t.content.trim().is_empty()) {
        return Err(AppError::Validation("Messages cannot be empty".to_string()));
    }
    if turns.iter().any(|t| t.content.chars().count() > MAX_TURN_CHARS) {
        return Err(AppError::Validation(format!(
            "Messages are limited to {MAX_TURN_CHARS} characters"
        )));
    }
    Ok(())
}

pub fn build_system_prompt(standards: &[Standard]) -> String {
    let catalog = standards
        .iter()
        .map(|s| format!("{} | {}", s.code, s.title))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "{}\n\n{JSON_ONLY_SYSTEM}",
        SALES_CHAT_SYSTEM_TEMPLATE.replace("{catalog}", &catalog)
    )
}

pub async fn sales_reply(
    llm: &LlmClient,
    standards: &[Standard],
    turns: &[ChatTurn],
) -> Result<SalesReply, AppError> {
    validate_transcript(turns)?;
    llm.converse_json(turns, &build_system_prompt(standards))
        .await
        .map_err(|e| AppError::Llm(format!("Sales assistant failed: {e}")))
}
