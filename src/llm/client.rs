use crate::config::AssistantConfig;
use crate::error::{AssistantError, Result};
use crate::llm::types::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use log::{debug, warn};
use reqwest::Client;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Minimal client for the generateContent endpoint of the generative-language API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    /// Builds a client from configuration; fails when no API key is configured.
    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        let api_key = config.require_gemini_key()?;
        Ok(Self::new(
            api_key,
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The key travels in a header so it never appears in a request URL.
    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Sends one JSON-mode prompt and returns the raw text of the first candidate.
    pub async fn generate_text(
        &self,
        prompt: &str,
        response_schema: Option<serde_json::Value>,
    ) -> Result<String> {
        let payload = GenerateContentRequest::json_prompt(prompt, response_schema);
        debug!(
            "Sending {} character prompt to model {}",
            prompt.len(),
            self.model
        );

        let res = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send()
            .await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await?;
            let message = serde_json::from_str::<ApiErrorEnvelope>(&err_text)
                .map(|envelope| envelope.error.message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("API request failed with status {}", status));
            warn!("Generative API returned {}: {}", status, message);
            return Err(AssistantError::AnalysisFailure(message));
        }

        let body: GenerateContentResponse = res.json().await?;
        body.first_text().map(str::to_string).ok_or_else(|| {
            AssistantError::AnalysisFailure("Received an empty response from the AI.".to_string())
        })
    }
}
