//! Gemini `generateContent` transport over blocking HTTPS

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{ProviderError, Transport};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Blocking Gemini client; the agent's global timeout bounds every call
pub struct GeminiTransport {
    agent: ureq::Agent,
    url: String,
}

impl GeminiTransport {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs)))
            .build();
        let agent = ureq::Agent::new_with_config(config);
        Self {
            agent,
            url: generate_url(base_url, model),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn generate_url(base_url: &str, model: &str) -> String {
    format!(
        "{}/v1beta/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    )
}

/// Wrap the prompt text and ask for a JSON reply
fn request_body(prompt: &str) -> serde_json::Value {
    json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": { "responseMimeType": "application/json" }
    })
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

/// Join the text parts of the first candidate
fn extract_text(body: &str) -> Result<String, ProviderError> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Malformed(format!("unexpected response envelope: {}", e)))?;
    let content = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .ok_or_else(|| ProviderError::Malformed("response has no candidates".to_string()))?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    if text.is_empty() {
        return Err(ProviderError::Malformed("candidate has no text".to_string()));
    }
    Ok(text)
}

impl Transport for GeminiTransport {
    fn send(&self, credential: &str, prompt: &str) -> Result<String, ProviderError> {
        let body = request_body(prompt).to_string();
        let mut response = self
            .agent
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", credential)
            .send(body.as_bytes())
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ProviderError::Transport(format!("failed to read response body: {}", e)))?;
        extract_text(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_url() {
        assert_eq!(
            generate_url("https://example.test/", "gemini-1.5-flash"),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_asks_for_json() {
        let body = request_body("{\"task\":\"x\"}");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "{\"task\":\"x\"}");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]}}]}"#;
        assert_eq!(extract_text(body).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_extract_text_without_candidates() {
        assert!(matches!(
            extract_text(r#"{"candidates":[]}"#),
            Err(ProviderError::Malformed(_))
        ));
        assert!(matches!(
            extract_text(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#),
            Err(ProviderError::Malformed(_))
        ));
        assert!(matches!(extract_text("<html>"), Err(ProviderError::Malformed(_))));
    }

    #[test]
    fn test_unreachable_host_is_transport_error() {
        let transport = GeminiTransport::new("http://127.0.0.1:9", DEFAULT_GEMINI_MODEL, 1);
        assert!(matches!(
            transport.send("key", "{}"),
            Err(ProviderError::Transport(_))
        ));
    }
}
