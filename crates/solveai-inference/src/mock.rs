//! Scripted generation backend for deterministic testing.
//!
//! JSON-mode requests (solves) and text-mode requests (transcriptions) get
//! separate canned answers, and every request is recorded for assertions.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use solveai_inference::mock::MockGenerationBackend;
//! use solveai_inference::SolverClient;
//!
//! let backend = Arc::new(
//!     MockGenerationBackend::new()
//!         .with_solve_response(r#"{"finalAnswer": "42"}"#)
//!         .with_extract_response("Questão 1"),
//! );
//! let solver = SolverClient::new(backend.clone());
//! assert!(solver.is_configured());
//! assert_eq!(backend.call_count(), 0);
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use solveai_core::{Error, GenerationBackend, GenerationRequest, ResponseFormat, Result};

/// Mock generation backend for testing.
#[derive(Clone)]
pub struct MockGenerationBackend {
    configured: bool,
    model: String,
    solve_response: String,
    extract_response: String,
    extract_error: Option<String>,
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerationBackend {
    /// Configured backend answering `{}` to solves and `""` to extractions.
    pub fn new() -> Self {
        Self {
            configured: true,
            model: "mock-gemini".to_string(),
            solve_response: "{}".to_string(),
            extract_response: String::new(),
            extract_error: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Backend without a credential.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    /// Text returned for JSON-mode requests.
    pub fn with_solve_response(mut self, response: impl Into<String>) -> Self {
        self.solve_response = response.into();
        self
    }

    /// Text returned for text-mode requests.
    pub fn with_extract_response(mut self, response: impl Into<String>) -> Self {
        self.extract_response = response.into();
        self
    }

    /// Make every text-mode request fail with an inference error.
    pub fn with_extract_error(mut self, message: impl Into<String>) -> Self {
        self.extract_error = Some(message.into());
        self
    }

    /// All recorded requests, oldest first.
    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of text-mode (extraction) requests received.
    pub fn extract_call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.response_format == ResponseFormat::Text)
            .count()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request.clone());

        if !self.configured {
            return Err(Error::Config("mock backend is not configured".to_string()));
        }

        match request.response_format {
            ResponseFormat::Json => Ok(self.solve_response.clone()),
            ResponseFormat::Text => match self.extract_error {
                Some(ref message) => Err(Error::Inference(message.clone())),
                None => Ok(self.extract_response.clone()),
            },
        }
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
