//! SnapSolve · Coding Problem Relay Backend
//!
//! - Axum HTTP API: problem screenshots in, structured problems and
//!   generated solutions out
//! - OpenAI-compatible chat-completions upstream (vision + text models)
//!
//! Important env variables:
//!   PORT                : u16 (default 5000)
//!   OPENAI_API_KEY      : required; bearer credential for the completion API
//!   OPENAI_BASE_URL     : default "https://api.openai.com/v1"
//!   OPENAI_VISION_MODEL : extraction model, default "gpt-4o"
//!   OPENAI_SOLVER_MODEL : generation model, default "gpt-4o"
//!   ALLOWED_ORIGINS     : comma-separated CORS allow-list (default: allow all)
//!   IMAGE_DUMP_DIR      : if set, compressed screenshots are also written here
//!   PROMPTS_CONFIG_PATH : path to TOML overriding the built-in prompts
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use snapsolve_backend::routes::build_router;
use snapsolve_backend::state::AppState;
use snapsolve_backend::telemetry;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (settings, prompts, OpenAI client).
  let state = Arc::new(AppState::from_env()?);

  let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));

  // Build the HTTP router with routes, CORS, body limit and tracing layers.
  let app = build_router(state);

  let listener = TcpListener::bind(addr).await?;
  info!(target: "snapsolve", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
