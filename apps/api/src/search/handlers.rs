use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::search::debounce::Debounced;
use crate::search::suggester::{suggest, Suggestion, MIN_QUERY_CHARS};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SuggestionQuery {
    #[serde(default)]
    pub q: String,
    /// Identifies the typing session. Without it the lookup is not debounced.
    pub client_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub query: String,
    /// True when a newer query from the same client replaced this one.
    pub superseded: bool,
    pub suggestions: Vec<Suggestion>,
}

/// GET /api/v1/search/suggestions
pub async fn handle_suggestions(
    State(state): State<AppState>,
    Query(params): Query<SuggestionQuery>,
) -> Result<Json<SuggestionResponse>, AppError> {
    let query = params.q.trim().to_string();

    if query.chars().count() < MIN_QUERY_CHARS {
        return Ok(Json(SuggestionResponse {
            query,
            superseded: false,
            suggestions: vec![],
        }));
    }

    let catalog = state.catalog.clone();
    let needle = query.as_str();
    let lookup = || async move {
        let standards = catalog.list_standards().await?;
        Ok::<_, AppError>(suggest(&standards, needle))
    };

    let outcome = match params.client_id.as_deref() {
        Some(client_id) => state.suggestions.debouncer(client_id).run(lookup).await,
        None => Debounced::Fresh(lookup().await),
    };

    let response = match outcome {
        Debounced::Fresh(result) => SuggestionResponse {
            suggestions: result?,
            query,
            superseded: false,
        },
        Debounced::Superseded => SuggestionResponse {
            query,
            superseded: true,
            suggestions: vec![],
        },
    };

    Ok(Json(response))
}
