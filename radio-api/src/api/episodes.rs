//! Episode listing and date filtering
//!
//! Unknown programs are not an error: they select nothing and the response
//! is an empty array.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use radio_common::{DateFilter, Episode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::AppState;

/// Query parameters for the episode list
#[derive(Debug, Deserialize)]
pub struct ProgramQuery {
    /// Program name; blank means every program
    pub programa: Option<String>,
}

/// Query parameters for the date filter
#[derive(Debug, Deserialize)]
pub struct DateQuery {
    /// Month of broadcast (optional)
    pub mes: Option<i32>,

    /// Program name (optional)
    pub programa: Option<String>,
}

/// Treat `?programa=` like an absent filter
fn program_filter(programa: Option<&str>) -> Option<&str> {
    programa.filter(|p| !p.is_empty())
}

/// GET /programas/?programa=6x3
///
/// Every episode, optionally restricted to one program.
pub async fn list_episodes(
    State(state): State<AppState>,
    query: Result<Query<ProgramQuery>, QueryRejection>,
) -> Result<Json<Vec<Episode>>, FilterError> {
    let Query(query) = query?;
    let program = program_filter(query.programa.as_deref());

    let episodes = state.engine().list_all(program);
    debug!("list program={:?}: {} episodes", program, episodes.len());
    Ok(Json(episodes))
}

/// GET /programas/fecha/:year?mes=10&programa=6x3
///
/// Episodes of one year, narrowed by month and program when given.
pub async fn episodes_by_date(
    State(state): State<AppState>,
    year: Result<Path<i32>, PathRejection>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> Result<Json<Vec<Episode>>, FilterError> {
    let Path(year) = year?;
    let Query(query) = query?;

    let filter = DateFilter {
        year,
        month: query.mes,
        program: program_filter(query.programa.as_deref()).map(str::to_string),
    };

    let episodes = state.engine().filter_by_date(&filter);
    debug!("date filter {:?}: {} episodes", filter, episodes.len());
    Ok(Json(episodes))
}

/// Filter errors
#[derive(Debug)]
pub enum FilterError {
    InvalidPath(String),
    InvalidQuery(String),
}

impl From<PathRejection> for FilterError {
    fn from(rejection: PathRejection) -> Self {
        FilterError::InvalidPath(rejection.body_text())
    }
}

impl From<QueryRejection> for FilterError {
    fn from(rejection: QueryRejection) -> Self {
        FilterError::InvalidQuery(rejection.body_text())
    }
}

impl IntoResponse for FilterError {
    fn into_response(self) -> Response {
        let message = match self {
            FilterError::InvalidPath(msg) => format!("Invalid path parameter: {}", msg),
            FilterError::InvalidQuery(msg) => format!("Invalid query parameter: {}", msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
    }
}
