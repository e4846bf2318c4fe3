//! Title search
//!
//! The minimum term length is enforced here, at the HTTP boundary. The query
//! engine itself accepts any term.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use radio_common::Episode;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::AppState;

/// Shortest accepted search term, in characters
pub const MIN_SEARCH_LEN: usize = 3;

/// Query parameters for title search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search term (required)
    pub q: Option<String>,
}

/// GET /programas/buscar/?q=beethoven
///
/// Case-insensitive title search across every program.
pub async fn search_episodes(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Episode>>, SearchError> {
    let Query(query) = query.map_err(|e| SearchError::InvalidQuery(e.body_text()))?;
    let term = validate_term(query.q)?;

    let episodes = state.engine().search_by_title(&term);
    debug!("search {:?}: {} episodes", term, episodes.len());
    Ok(Json(episodes))
}

fn validate_term(q: Option<String>) -> Result<String, SearchError> {
    let term = q.ok_or(SearchError::MissingTerm)?;
    let len = term.chars().count();
    if len < MIN_SEARCH_LEN {
        return Err(SearchError::TermTooShort(len));
    }
    Ok(term)
}

/// Search errors
#[derive(Debug, PartialEq, Eq)]
pub enum SearchError {
    MissingTerm,
    TermTooShort(usize),
    InvalidQuery(String),
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let message = match self {
            SearchError::MissingTerm => "Missing required query parameter: q".to_string(),
            SearchError::TermTooShort(len) => format!(
                "Search term too short: {} characters (minimum {})",
                len, MIN_SEARCH_LEN
            ),
            SearchError::InvalidQuery(msg) => format!("Invalid query parameter: {}", msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
    }
}
