//! Application state: settings, prompts, and the OpenAI client.
//!
//! Built once at startup from the environment and shared behind an `Arc`.
//! Requests never mutate it; the two handlers only read the client and the
//! prompt set. There are no per-request stores in this service.

use tracing::{info, instrument};

use crate::config::{load_prompts_from_env, Prompts, Settings};
use crate::openai::OpenAI;

#[derive(Clone)]
pub struct AppState {
    pub openai: OpenAI,
    pub prompts: Prompts,
    pub settings: Settings,
}

impl AppState {
    /// Build state from env: load settings and prompts, init the OpenAI
    /// client. Fails when OPENAI_API_KEY is missing; this service is a relay
    /// and has nothing to do without its upstream.
    #[instrument(level = "info", skip_all)]
    pub fn from_env() -> Result<Self, String> {
        let settings = Settings::from_env();

        // TOML prompt overrides if provided, otherwise built-in defaults.
        let prompts = load_prompts_from_env().unwrap_or_default();

        let openai = OpenAI::from_env()
            .ok_or_else(|| "OPENAI_API_KEY is not set; refusing to start without it".to_string())?;

        info!(
            target: "snapsolve",
            base_url = %openai.base_url,
            vision_model = %openai.vision_model,
            solver_model = %openai.solver_model,
            port = settings.port,
            cors = %settings
                .allowed_origins
                .as_ref()
                .map(|o| o.join(","))
                .unwrap_or_else(|| "any".into()),
            image_dump = settings.image_dump_dir.is_some(),
            "Configuration loaded"
        );

        Ok(Self { openai, prompts, settings })
    }
}
