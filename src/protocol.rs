//! Public request/response DTOs for the HTTP endpoints (serde ready), plus
//! the boundary validation that turns untrusted JSON into typed requests.
//!
//! Handlers accept raw `serde_json::Value` bodies and go through the parse
//! functions here, so shape problems surface as 400s with a useful message
//! instead of whatever the extractor default would be.

use serde::{Deserialize, Serialize};

use crate::domain::ProblemDescription;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ExtractIn {
    #[serde(rename = "imageDataList", default)]
    pub image_data_list: Vec<String>,
    #[serde(default)]
    pub language: String,
}

/// Extraction response: the parsed problem plus the language token echoed
/// back unchanged.
#[derive(Debug, Serialize)]
pub struct ExtractOut {
    #[serde(rename = "problemInfo")]
    pub problem_info: ProblemDescription,
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateIn {
    #[serde(rename = "problemInfo")]
    pub problem_info: ProblemDescription,
    #[serde(default)]
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

/// Validate an `/api/extract` body. The image list must be present and
/// non-empty; the language token is free-form and may be absent.
pub fn parse_extract_request(body: serde_json::Value) -> Result<ExtractIn, ApiError> {
    let req: ExtractIn = serde_json::from_value(body)
        .map_err(|e| ApiError::InvalidRequest(format!("Malformed extract request: {e}")))?;
    if req.image_data_list.is_empty() {
        return Err(ApiError::InvalidRequest("No image data provided".into()));
    }
    Ok(req)
}

/// Validate an `/api/generate` body. `problemInfo` must be present and carry
/// every required field of [`ProblemDescription`].
pub fn parse_generate_request(body: serde_json::Value) -> Result<GenerateIn, ApiError> {
    if body.get("problemInfo").map_or(true, |v| v.is_null()) {
        return Err(ApiError::InvalidRequest("Problem info is required".into()));
    }
    serde_json::from_value(body)
        .map_err(|e| ApiError::InvalidRequest(format!("Problem info is incomplete: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_rejects_missing_and_empty_image_lists() {
        let err = parse_extract_request(json!({ "language": "python" })).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(m) if m == "No image data provided"));

        let err =
            parse_extract_request(json!({ "imageDataList": [], "language": "python" })).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(m) if m == "No image data provided"));
    }

    #[test]
    fn extract_accepts_images_and_defaults_language() {
        let req = parse_extract_request(json!({ "imageDataList": ["aGk="] })).unwrap();
        assert_eq!(req.image_data_list, vec!["aGk=".to_string()]);
        assert_eq!(req.language, "");
    }

    #[test]
    fn generate_requires_problem_info() {
        let err = parse_generate_request(json!({ "language": "rust" })).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(m) if m == "Problem info is required"));
    }

    #[test]
    fn generate_rejects_incomplete_problem_info() {
        let err = parse_generate_request(json!({
            "problemInfo": { "problem_statement": "only a statement" },
            "language": "rust",
        }))
        .unwrap_err();
        let ApiError::InvalidRequest(message) = err else {
            panic!("expected InvalidRequest");
        };
        assert!(message.starts_with("Problem info is incomplete"), "{message}");
    }
}
