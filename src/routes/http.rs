//! HTTP endpoint handlers. These are thin wrappers that validate the body
//! and forward to the flows in `logic`; each handler is instrumented.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::logic;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_extract(
  State(state): State<Arc<AppState>>,
  Json(body): Json<serde_json::Value>,
) -> Result<Json<ExtractOut>, ApiError> {
  let req = parse_extract_request(body)?;
  let problem = logic::extract_problem(&state, &req.image_data_list, &req.language).await?;
  info!(target: "snapsolve", image_count = req.image_data_list.len(), language = %req.language, "problem extracted");
  Ok(Json(ExtractOut { problem_info: problem, language: req.language }))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_generate(
  State(state): State<Arc<AppState>>,
  Json(body): Json<serde_json::Value>,
) -> Result<Json<crate::domain::Solution>, ApiError> {
  let req = parse_generate_request(body)?;
  let solution = logic::generate_solution(&state, &req.problem_info, &req.language).await?;
  info!(target: "snapsolve", language = %req.language, thoughts = solution.thoughts.len(), "solution generated");
  Ok(Json(solution))
}
