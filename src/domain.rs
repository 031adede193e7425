//! Domain models: the structured problem a screenshot decodes to, and the
//! solution the solver model produces. Both live for a single request.
//!
//! Field names are the wire format; `parameters` and `test_cases` are opaque
//! to this service and passed through untouched.

use serde::{Deserialize, Serialize};

/// Structured description of a coding problem, as extracted by the vision
/// model. Every field is required; incomplete objects are rejected at the
/// boundary before anything is sent upstream.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProblemDescription {
  pub problem_statement: String,
  pub input_format: InputFormat,
  pub output_format: OutputFormat,
  pub complexity: Complexity,
  pub test_cases: Vec<serde_json::Value>,
  pub validation_type: String,
  pub difficulty: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputFormat {
  pub description: String,
  pub parameters: Vec<serde_json::Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputFormat {
  pub description: String,
  #[serde(rename = "type")]
  pub kind: String,
  pub subtype: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Complexity {
  pub time: String,
  pub space: String,
}

/// Generated answer for a problem. Returned to the caller exactly as the
/// solver model produced it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Solution {
  pub code: String,
  /// 3-5 sentences walking through the approach (prompt-enforced, not
  /// validated here).
  pub thoughts: Vec<String>,
  pub time_complexity: String,
  pub space_complexity: String,
}
