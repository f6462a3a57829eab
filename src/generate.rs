use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::form::{PartialRecord, EXTRACTION_FIELDS};
use crate::prompt::extraction_prompt;
use crate::render::PageImage;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("API key not set: {0}")]
    MissingApiKey(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("service returned {status}: {message}")]
    Service { status: u16, message: String },
    #[error("empty response")]
    EmptyResponse,
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Prompt in, document text out.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

/// Page image in, field map out. Keys outside the extraction field list are
/// left to the caller to ignore.
pub trait FieldExtractor {
    fn extract(&self, image: &PageImage) -> Result<PartialRecord, GenerateError>;
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    pub endpoint: String,
    pub model: String,
    api_key: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    error: ServiceErrorBody,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    message: String,
}

/// Response schema for extraction: an object of optional string fields.
pub fn extraction_schema() -> Value {
    let properties: serde_json::Map<String, Value> = EXTRACTION_FIELDS
        .iter()
        .map(|f| (f.to_string(), json!({ "type": "STRING" })))
        .collect();
    json!({ "type": "OBJECT", "properties": properties })
}

impl GeminiClient {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        GeminiClient {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    fn call(&self, body: Value) -> Result<String, GenerateError> {
        if self.api_key.trim().is_empty() {
            return Err(GenerateError::MissingApiKey(self.model.clone()));
        }
        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        let response = agent
            .post(&self.url())
            .query("key", &self.api_key)
            .set("Content-Type", "application/json")
            .send_json(body);
        let response = match response {
            Ok(r) => r,
            Err(ureq::Error::Status(status, r)) => {
                let raw = r.into_string().unwrap_or_default();
                let message = serde_json::from_str::<ServiceError>(&raw)
                    .map(|e| e.error.message)
                    .unwrap_or(raw);
                return Err(GenerateError::Service { status, message });
            }
            Err(e) => return Err(GenerateError::Transport(e.to_string())),
        };
        let parsed: GenerateResponse =
            response.into_json().map_err(|e| GenerateError::Malformed(e.to_string()))?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(GenerateError::EmptyResponse);
        }
        Ok(text)
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.call(json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        }))
    }
}

impl FieldExtractor for GeminiClient {
    fn extract(&self, image: &PageImage) -> Result<PartialRecord, GenerateError> {
        let raw = self.call(json!({
            "contents": [{
                "parts": [
                    { "text": extraction_prompt() },
                    { "inlineData": { "mimeType": image.mime, "data": STANDARD.encode(&image.bytes) } }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": extraction_schema()
            }
        }))?;
        parse_extraction(&raw)
    }
}

/// Parse the extractor's JSON object. Non-string values are stringified,
/// nulls are dropped.
pub fn parse_extraction(raw: &str) -> Result<PartialRecord, GenerateError> {
    let body = raw.trim().trim_start_matches("```json").trim_start_matches("```").trim_end_matches("```").trim();
    let value: Value = serde_json::from_str(body).map_err(|e| GenerateError::Malformed(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(GenerateError::Malformed("expected a JSON object".into()));
    };
    Ok(map
        .into_iter()
        .filter_map(|(k, v)| match v {
            Value::String(s) => Some((k, s)),
            Value::Null => None,
            other => Some((k, other.to_string())),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_json_is_accepted() {
        let rec = parse_extraction("```json\n{\"nomorPerkara\": \"1/Pdt.Eks/2024/PN Bdg\", \"x\": null}\n```").unwrap();
        assert_eq!(rec.get("nomorPerkara").map(String::as_str), Some("1/Pdt.Eks/2024/PN Bdg"));
        assert!(!rec.contains_key("x"));
    }

    #[test]
    fn array_is_malformed() {
        assert!(matches!(parse_extraction("[1,2]"), Err(GenerateError::Malformed(_))));
    }

    #[test]
    fn schema_lists_every_field() {
        let schema = extraction_schema();
        assert_eq!(schema["properties"].as_object().map(|m| m.len()), Some(EXTRACTION_FIELDS.len()));
    }
}
