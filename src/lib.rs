//! SnapSolve backend: a thin relay between screenshot clients and an
//! OpenAI-compatible completion API.
//!
//! The binary lives in `main.rs`; everything else is exposed here so the
//! integration tests can drive the real router.

pub mod config;
pub mod domain;
pub mod error;
pub mod imaging;
pub mod logic;
pub mod openai;
pub mod protocol;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod util;

pub use state::AppState;
