//! Process configuration: listener settings from env and the prompt set used
//! against the completion API (defaults below, optional TOML override).
//!
//! Everything here is read once at startup and kept immutable afterwards.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, info};

/// Listener and request-handling settings, read from env with defaults.
#[derive(Clone, Debug)]
pub struct Settings {
  /// Listen port (PORT).
  pub port: u16,
  /// CORS allow-list (ALLOWED_ORIGINS, comma-separated). None = allow any.
  pub allowed_origins: Option<Vec<String>>,
  /// Directory for compressed-screenshot scratch copies (IMAGE_DUMP_DIR).
  /// None disables the dump entirely.
  pub image_dump_dir: Option<PathBuf>,
}

impl Default for Settings {
  fn default() -> Self {
    Self { port: 5000, allowed_origins: None, image_dump_dir: None }
  }
}

impl Settings {
  pub fn from_env() -> Self {
    let default = Self::default();
    Self {
      port: std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(default.port),
      allowed_origins: std::env::var("ALLOWED_ORIGINS").ok().map(|raw| {
        raw.split(',')
          .map(str::trim)
          .filter(|o| !o.is_empty())
          .map(str::to_string)
          .collect()
      }),
      image_dump_dir: std::env::var("IMAGE_DUMP_DIR").ok().map(PathBuf::from),
    }
  }
}

/// Prompts used by the OpenAI client. Defaults carry the schema both handlers
/// expect; override them in TOML if you need to tune tone/structure, but keep
/// the JSON shapes intact or parsing will reject the model output.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  // Problem extraction (vision)
  pub extract_system: String,
  pub extract_user_intro: String,
  // Solution generation
  pub generate_system: String,
  pub generate_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      extract_system: r#"You are an AI that extracts structured problem statements from images containing coding problems. The image may sometimes lack a full problem name and only include elements like class names or function names. Extract and return a JSON object with the problem details following the given structure. Strictly ensure to return the response in this given format:
{
  "problem_statement": "string",
  "input_format": { "description": "string", "parameters": [] },
  "output_format": { "description": "string", "type": "string", "subtype": "string" },
  "complexity": { "time": "string", "space": "string" },
  "test_cases": [],
  "validation_type": "string",
  "difficulty": "string"
}"#
        .into(),
      extract_user_intro: "Extract problem statement from this image:".into(),
      generate_system: "Solve the given programming problem efficiently and return JSON in the specified format. The code should have commented explanations for each step.".into(),
      generate_user_template: r#"Solve this problem using {language}:

Problem Statement: {problem_statement}

Input Format: {input_format}

Output Format: {output_format}

Complexity: {complexity}

Test Cases: {test_cases}

Validation Type: {validation_type}

Difficulty: {difficulty}

Format the response strictly as:
{
  "code": "<code>",
  "thoughts": [
    "<thought 1>",
    "<thought 2>",
    "<thought 3>"
  ],
  "time_complexity": "<time complexity>",
  "space_complexity": "<space complexity>"
}

The 'thoughts' field should return an array of 3 to 5 sentences explaining the approach to solving the problem step by step.

The 'time_complexity' and 'space_complexity' fields should return a sentence explaining the respective complexity and why the code has that complexity.

Example format:
{
  "code": "def merge(intervals): ...",
  "thoughts": [
    "First, check if the input list is empty and return an empty list.",
    "Next, sort the intervals based on their start values.",
    "Iterate through the sorted list and merge overlapping intervals.",
    "Use a result list to store merged intervals.",
    "Return the merged intervals at the end."
  ],
  "time_complexity": "O(n log n), where n is the number of intervals, due to the sorting step.",
  "space_complexity": "O(n), where n is the number of intervals, as we need to store the merged intervals in a new list."
}

Ensure that the response follows this exact JSON structure."#
        .into(),
    }
  }
}

/// Attempt to load `Prompts` from PROMPTS_CONFIG_PATH. On any parsing/IO
/// error, returns None and the caller falls back to the defaults.
pub fn load_prompts_from_env() -> Option<Prompts> {
  let path = std::env::var("PROMPTS_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<Prompts>(&s) {
      Ok(prompts) => {
        info!(target: "snapsolve", %path, "Loaded prompt config (TOML)");
        Some(prompts)
      }
      Err(e) => {
        error!(target: "snapsolve", %path, error = %e, "Failed to parse TOML prompt config");
        None
      }
    },
    Err(e) => {
      error!(target: "snapsolve", %path, error = %e, "Failed to read TOML prompt config file");
      None
    }
  }
}
