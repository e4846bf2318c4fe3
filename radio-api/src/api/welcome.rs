//! Root endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: String,
    /// Loaded programs in catalog order
    pub programs: Vec<String>,
}

/// GET /
///
/// Welcome message plus the programs that can be queried.
pub async fn welcome(State(state): State<AppState>) -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Bienvenido a la API de programas de radio".to_string(),
        programs: state.catalog.program_names().map(str::to_string).collect(),
    })
}
