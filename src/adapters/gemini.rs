use crate::domain::ports::NameGenerator;
use crate::utils::error::{Result, ToolboxError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

impl GeminiSettings {
    /// Reads `GEMINI_API_KEY`, falling back to `API_KEY`.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());
        Self {
            api_key,
            ..Self::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct NamesPayload {
    names: Vec<String>,
}

/// Team names from the Gemini `generateContent` API.
pub struct GeminiNameGenerator {
    client: Client,
    settings: GeminiSettings,
}

impl GeminiNameGenerator {
    pub fn new(settings: GeminiSettings) -> Result<Self> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { client, settings })
    }

    pub fn is_configured(&self) -> bool {
        self.settings.api_key.is_some()
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.model
        )
    }

    fn request_body(count: usize) -> serde_json::Value {
        json!({
            "contents": [{
                "parts": [{
                    "text": format!(
                        "Generate {} creative, professional, and fun corporate team names. Keep them brief (1-3 words).",
                        count
                    )
                }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "names": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": ["names"]
                }
            }
        })
    }

    fn parse_names(body: GenerateContentResponse) -> Result<Vec<String>> {
        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| ToolboxError::generation("response contained no candidates"))?;

        let payload: NamesPayload = serde_json::from_str(&text)
            .map_err(|e| ToolboxError::generation(format!("unexpected names payload: {}", e)))?;
        Ok(payload.names)
    }
}

#[async_trait]
impl NameGenerator for GeminiNameGenerator {
    async fn generate_names(&self, count: usize) -> Result<Vec<String>> {
        let Some(api_key) = self.settings.api_key.as_deref() else {
            return Err(ToolboxError::generation("API key not configured"));
        };

        tracing::debug!("Requesting {} team names from {}", count, self.url());
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&Self::request_body(count))
            .send()
            .await
            .map_err(|e| ToolboxError::generation(e.to_string()))?;

        let status = response.status();
        tracing::debug!("Name generator response status: {}", status);
        if !status.is_success() {
            return Err(ToolboxError::generation(format!(
                "service responded with {}",
                status
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ToolboxError::generation(e.to_string()))?;
        Self::parse_names(body)
    }
}
