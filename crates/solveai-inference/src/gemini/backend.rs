//! Gemini REST backend implementation.

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use solveai_core::defaults::{
    ENV_GEMINI_API_KEY, ENV_GEMINI_BASE_URL, ENV_GEMINI_MODEL, ENV_GEMINI_TIMEOUT, GEMINI_MODEL,
    GEMINI_TIMEOUT_SECS, GEMINI_URL,
};
use solveai_core::{Error, GenerationBackend, GenerationRequest, ResponseFormat, Result};

use super::error::{to_solveai_error, GeminiErrorCode};
use super::types::*;

/// Configuration for the Gemini backend.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key. `None` means the backend is unconfigured.
    pub api_key: Option<String>,
    /// Model to use for generation.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: GEMINI_URL.to_string(),
            api_key: None,
            model: GEMINI_MODEL.to_string(),
            timeout_seconds: GEMINI_TIMEOUT_SECS,
        }
    }
}

impl GeminiConfig {
    /// Read configuration from environment variables.
    ///
    /// A blank `GEMINI_API_KEY` counts as absent.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var(ENV_GEMINI_BASE_URL)
                .unwrap_or_else(|_| GEMINI_URL.to_string()),
            api_key: std::env::var(ENV_GEMINI_API_KEY)
                .ok()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            model: std::env::var(ENV_GEMINI_MODEL).unwrap_or_else(|_| GEMINI_MODEL.to_string()),
            timeout_seconds: std::env::var(ENV_GEMINI_TIMEOUT)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(GEMINI_TIMEOUT_SECS),
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Gemini `generateContent` backend.
pub struct GeminiBackend {
    client: Client,
    config: GeminiConfig,
}

impl GeminiBackend {
    /// Create a new Gemini backend with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        if config.api_key.is_some() {
            info!(
                subsystem = "inference",
                component = "gemini",
                url = %config.base_url,
                model = %config.model,
                "Initializing Gemini backend"
            );
        } else {
            warn!(
                subsystem = "inference",
                component = "gemini",
                "{} not set. AI features will not work.",
                ENV_GEMINI_API_KEY
            );
        }

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

/// Build the wire request: inline payload first, then the instruction text.
pub(crate) fn build_request_body(request: &GenerationRequest) -> GenerateContentRequest {
    let mut parts = Vec::with_capacity(2);
    if let Some(ref inline) = request.inline_data {
        parts.push(Part::inline(&inline.mime_type, &inline.data));
    }
    parts.push(Part::text(&request.prompt));

    let config = GenerationConfig {
        temperature: request.temperature,
        response_mime_type: match request.response_format {
            ResponseFormat::Json => Some("application/json".to_string()),
            ResponseFormat::Text => None,
        },
    };

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
        generation_config: (!config.is_empty()).then_some(config),
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config(format!("{} is not configured", ENV_GEMINI_API_KEY)))?;

        let start = Instant::now();
        debug!(
            subsystem = "inference",
            component = "gemini",
            op = "generate",
            model = %self.config.model,
            prompt_len = request.prompt.len(),
            has_inline_data = request.inline_data.is_some(),
            "Calling Gemini"
        );

        let response = self
            .client
            .post(self.endpoint_url())
            .header("x-goog-api-key", api_key)
            .json(&build_request_body(request))
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let (error_status, message) = match serde_json::from_str::<GeminiErrorResponse>(&body)
            {
                Ok(parsed) => (parsed.error.status.unwrap_or_default(), parsed.error.message),
                Err(_) => (String::new(), body),
            };
            let code = GeminiErrorCode::from_response(status.as_u16(), &error_status);
            warn!(
                subsystem = "inference",
                component = "gemini",
                op = "generate",
                status = status.as_u16(),
                error_code = ?code,
                error_status = %error_status,
                upstream_message = %message,
                "Gemini returned an error"
            );
            return Err(to_solveai_error(code, status.as_u16()));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let text = result.text();
        debug!(
            subsystem = "inference",
            component = "gemini",
            op = "generate",
            response_len = text.len(),
            finish_reason = result.finish_reason().unwrap_or("unknown"),
            duration_ms = start.elapsed().as_millis() as u64,
            "Gemini call complete"
        );
        Ok(text)
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeminiConfig::default();
        assert_eq!(config.base_url, GEMINI_URL);
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.timeout_seconds, 300);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_is_configured_follows_key() {
        let backend = GeminiBackend::new(GeminiConfig::default()).unwrap();
        assert!(!backend.is_configured());

        let backend = GeminiBackend::new(GeminiConfig::default().with_api_key("k")).unwrap();
        assert!(backend.is_configured());
        assert_eq!(backend.model_name(), "gemini-2.5-flash");
    }

    #[test]
    fn test_endpoint_url_trims_slash() {
        let config = GeminiConfig::default().with_base_url("http://127.0.0.1:9999/");
        let backend = GeminiBackend::new(config).unwrap();
        assert_eq!(
            backend.endpoint_url(),
            "http://127.0.0.1:9999/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_json_request_body() {
        let request = GenerationRequest::json("Resolva").with_temperature(0.1);
        let body = serde_json::to_value(build_request_body(&request)).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "Resolva");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        let temperature = body["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_text_request_body_with_image() {
        let request = GenerationRequest::text("Extraia").with_inline_data("image/png", "iVBOR");
        let body = serde_json::to_value(build_request_body(&request)).unwrap();

        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["inlineData"]["data"], "iVBOR");
        assert_eq!(parts[1]["text"], "Extraia");
        assert!(body.get("generationConfig").is_none());
    }

    #[tokio::test]
    async fn test_generate_without_key_is_config_error() {
        let backend = GeminiBackend::new(GeminiConfig::default()).unwrap();
        let err = backend
            .generate(&GenerationRequest::text("oi"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
