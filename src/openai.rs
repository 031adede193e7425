//! Minimal OpenAI-compatible client for our two use-cases.
//!
//! We only call chat.completions: once with image attachments to read a
//! problem off a screenshot, once with plain text to solve it. Calls are
//! instrumented and log model names, latencies, and token usage (not
//! contents).
//!
//! NOTE: We never log the API key and we keep payload truncations short.

use std::time::Instant;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::config::Prompts;
use crate::domain::{ProblemDescription, Solution};
use crate::util::{fill_template, strip_code_fences, trunc_for_log};

#[derive(Debug, Error)]
pub enum OpenAiError {
  #[error("request to completion API failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("completion API returned HTTP {status}: {message}")]
  Api { status: reqwest::StatusCode, message: String },
  #[error("completion API returned no choices")]
  NoChoices,
  #[error("model output is not the expected JSON: {detail}")]
  MalformedOutput { detail: String },
}

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub vision_model: String,
  pub solver_model: String,
}

impl OpenAI {
  pub fn new(api_key: String, base_url: String, vision_model: String, solver_model: String) -> Self {
    // No request timeout on purpose: multi-image vision calls routinely run
    // past anything reasonable for the rest of the service.
    Self { client: reqwest::Client::new(), api_key, base_url, vision_model, solver_model }
  }

  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok()?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let vision_model = std::env::var("OPENAI_VISION_MODEL").unwrap_or_else(|_| "gpt-4o".into());
    let solver_model = std::env::var("OPENAI_SOLVER_MODEL").unwrap_or_else(|_| "gpt-4o".into());
    Some(Self::new(api_key, base_url, vision_model, solver_model))
  }

  /// One chat completion round-trip; returns the first choice's content.
  #[instrument(level = "info", skip(self, messages), fields(model = %model))]
  async fn chat(
    &self,
    model: &str,
    messages: Vec<ChatMessageReq>,
    temperature: f32,
  ) -> Result<String, OpenAiError> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest { model: model.to_string(), messages, temperature };

    let res = self
      .client
      .post(&url)
      .header(USER_AGENT, "snapsolve-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req)
      .send()
      .await?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let message = extract_openai_error(&body).unwrap_or(body);
      return Err(OpenAiError::Api { status, message });
    }

    let body: ChatCompletionResponse = res.json().await?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body
      .choices
      .first()
      .and_then(|c| c.message.content.clone())
      .ok_or(OpenAiError::NoChoices)?;

    Ok(text.trim().to_string())
  }

  // --- High-level helpers (domain-specialized) ---

  /// Read a structured problem off one or more (already compressed) images.
  #[instrument(level = "info", skip(self, prompts, images_b64), fields(model = %self.vision_model, image_count = images_b64.len()))]
  pub async fn extract_problem(
    &self,
    prompts: &Prompts,
    images_b64: &[String],
  ) -> Result<ProblemDescription, OpenAiError> {
    let messages = build_extract_messages(prompts, images_b64);
    let start = Instant::now();
    let content = self.chat(&self.vision_model, messages, 0.2).await?;
    info!(elapsed = ?start.elapsed(), content_len = content.len(), "vision extraction response received");
    parse_model_json(&content)
  }

  /// Ask the solver model for a worked solution in the target language.
  #[instrument(level = "info", skip(self, prompts, problem), fields(model = %self.solver_model, %language, difficulty = %problem.difficulty))]
  pub async fn generate_solution(
    &self,
    prompts: &Prompts,
    problem: &ProblemDescription,
    language: &str,
  ) -> Result<Solution, OpenAiError> {
    let user = build_generate_prompt(prompts, problem, language);
    let messages = vec![
      ChatMessageReq {
        role: "system".into(),
        content: MessageContent::Text(prompts.generate_system.clone()),
      },
      ChatMessageReq { role: "user".into(), content: MessageContent::Text(user) },
    ];
    let start = Instant::now();
    let content = self.chat(&self.solver_model, messages, 0.2).await?;
    info!(elapsed = ?start.elapsed(), content_len = content.len(), "solver response received");
    parse_model_json(&content)
  }
}

/// System instruction plus a user message holding the intro text and one
/// inline-JPEG attachment per image, in input order.
fn build_extract_messages(prompts: &Prompts, images_b64: &[String]) -> Vec<ChatMessageReq> {
  let mut parts = Vec::with_capacity(images_b64.len() + 1);
  parts.push(ContentPart::Text { text: prompts.extract_user_intro.clone() });
  parts.extend(images_b64.iter().map(|b64| ContentPart::ImageUrl {
    image_url: ImageUrl { url: format!("data:image/jpeg;base64,{b64}") },
  }));

  vec![
    ChatMessageReq {
      role: "system".into(),
      content: MessageContent::Text(prompts.extract_system.clone()),
    },
    ChatMessageReq { role: "user".into(), content: MessageContent::Parts(parts) },
  ]
}

fn build_generate_prompt(prompts: &Prompts, problem: &ProblemDescription, language: &str) -> String {
  let pretty = |v: Result<String, serde_json::Error>| v.unwrap_or_else(|_| "{}".into());
  fill_template(
    &prompts.generate_user_template,
    &[
      ("language", language),
      ("problem_statement", &problem.problem_statement),
      ("input_format", &pretty(serde_json::to_string_pretty(&problem.input_format))),
      ("output_format", &pretty(serde_json::to_string_pretty(&problem.output_format))),
      ("complexity", &pretty(serde_json::to_string_pretty(&problem.complexity))),
      ("test_cases", &pretty(serde_json::to_string_pretty(&problem.test_cases))),
      ("validation_type", &problem.validation_type),
      ("difficulty", &problem.difficulty),
    ],
  )
}

/// Decode a model reply that should be a JSON document: try as-is first,
/// then once more with Markdown code fences stripped.
fn parse_model_json<T: DeserializeOwned>(content: &str) -> Result<T, OpenAiError> {
  match serde_json::from_str::<T>(content) {
    Ok(v) => Ok(v),
    Err(first) => {
      let stripped = strip_code_fences(content);
      serde_json::from_str::<T>(stripped).map_err(|second| OpenAiError::MalformedOutput {
        detail: format!(
          "direct parse: {first}; fence-stripped parse: {second}; content: {}",
          trunc_for_log(content, 200)
        ),
      })
    }
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
}
#[derive(Serialize)]
struct ChatMessageReq {
  role: String,
  content: MessageContent,
}
#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
  Text(String),
  Parts(Vec<ContentPart>),
}
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
  Text { text: String },
  ImageUrl { image_url: ImageUrl },
}
#[derive(Serialize)]
struct ImageUrl {
  url: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)]
  usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice {
  message: ChatMessageResp,
}
#[derive(Deserialize)]
struct ChatMessageResp {
  content: Option<String>,
}
#[derive(Deserialize)]
struct Usage {
  #[serde(default)]
  prompt_tokens: Option<u32>,
  #[serde(default)]
  completion_tokens: Option<u32>,
  #[serde(default)]
  total_tokens: Option<u32>,
}

/// Try to extract a clean error message from an OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap {
    error: EObj,
  }
  #[derive(Deserialize)]
  struct EObj {
    message: String,
  }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn extract_messages_carry_one_attachment_per_image_in_order() {
    let prompts = Prompts::default();
    let images = vec!["AAAA".to_string(), "BBBB".to_string(), "CCCC".to_string()];
    let messages = build_extract_messages(&prompts, &images);
    let v = serde_json::to_value(&messages).expect("serializable");

    assert_eq!(v[0]["role"], "system");
    assert!(v[0]["content"].is_string());

    let parts = v[1]["content"].as_array().expect("user content is parts");
    assert_eq!(parts.len(), images.len() + 1);
    assert_eq!(parts[0]["type"], "text");
    for (i, b64) in images.iter().enumerate() {
      assert_eq!(parts[i + 1]["type"], "image_url");
      assert_eq!(
        parts[i + 1]["image_url"]["url"],
        format!("data:image/jpeg;base64,{b64}")
      );
    }
  }

  #[test]
  fn generate_prompt_fills_every_placeholder() {
    let problem: ProblemDescription = serde_json::from_value(json!({
      "problem_statement": "Merge overlapping intervals.",
      "input_format": { "description": "list of intervals", "parameters": [] },
      "output_format": { "description": "merged list", "type": "array", "subtype": "int[]" },
      "complexity": { "time": "O(n log n)", "space": "O(n)" },
      "test_cases": [],
      "validation_type": "exact_match",
      "difficulty": "medium"
    }))
    .unwrap();

    let prompt = build_generate_prompt(&Prompts::default(), &problem, "rust");
    assert!(prompt.contains("Solve this problem using rust"));
    assert!(prompt.contains("Merge overlapping intervals."));
    assert!(prompt.contains("O(n log n)"));
    for leftover in ["{language}", "{problem_statement}", "{test_cases}", "{difficulty}"] {
      assert!(!prompt.contains(leftover), "unfilled placeholder {leftover}");
    }
  }

  #[test]
  fn fenced_and_bare_json_both_parse() {
    let sol = json!({
      "code": "fn main() {}",
      "thoughts": ["a", "b", "c"],
      "time_complexity": "O(1)",
      "space_complexity": "O(1)"
    })
    .to_string();

    let bare: Solution = parse_model_json(&sol).expect("bare");
    assert_eq!(bare.code, "fn main() {}");

    let fenced: Solution = parse_model_json(&format!("```json\n{sol}\n```")).expect("fenced");
    assert_eq!(fenced.thoughts.len(), 3);
  }

  #[test]
  fn malformed_content_is_reported_with_a_preview() {
    let err = parse_model_json::<Solution>("The answer is 42.").unwrap_err();
    let OpenAiError::MalformedOutput { detail } = err else {
      panic!("expected MalformedOutput");
    };
    assert!(detail.contains("The answer is 42."));
  }

  #[test]
  fn error_body_message_is_extracted() {
    let body = json!({ "error": { "message": "model overloaded" } }).to_string();
    assert_eq!(extract_openai_error(&body).as_deref(), Some("model overloaded"));
    assert_eq!(extract_openai_error("plain text error"), None);
  }
}
