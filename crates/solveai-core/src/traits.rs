//! Core traits for SolveAI abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// CATALOG REPOSITORY TRAITS
// =============================================================================

/// Repository for folder records.
#[async_trait]
pub trait FolderRepository: Send + Sync {
    /// Create a folder. Fails with `InvalidInput` if the trimmed name is empty.
    async fn create(&self, name: &str) -> Result<Folder>;

    /// List every folder. Order carries no meaning.
    async fn list(&self) -> Result<Vec<Folder>>;

    /// Fetch a folder; a missing id is `Ok(None)`, not an error.
    async fn get(&self, id: Uuid) -> Result<Option<Folder>>;

    /// Merge a patch into a stored folder and return the merged record.
    async fn update(&self, id: Uuid, patch: FolderPatch) -> Result<Folder>;

    /// Delete a folder and every file it owns.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Repository for files attached to folders.
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Store a file, assigning its id and creation time.
    async fn add(&self, file: NewContextFile) -> Result<ContextFile>;

    /// Fetch one file; a missing id is `Ok(None)`.
    async fn get(&self, id: Uuid) -> Result<Option<ContextFile>>;

    /// All files owned by a folder, through the folder index.
    async fn list_by_folder(&self, folder_id: Uuid) -> Result<Vec<ContextFile>>;

    /// Remove a file. Succeeds silently if it is already gone.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Record a transcription for later solves.
    async fn set_extracted_text(&self, id: Uuid, text: &str) -> Result<()>;

    /// Number of files owned by a folder.
    async fn count_by_folder(&self, folder_id: Uuid) -> Result<i64> {
        Ok(self.list_by_folder(folder_id).await?.len() as i64)
    }
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Output format requested from the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    #[default]
    Text,
    Json,
}

/// Binary payload sent alongside a prompt, already base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// A single generation call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub inline_data: Option<InlineData>,
    pub response_format: ResponseFormat,
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn json(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_format: ResponseFormat::Json,
            ..Default::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_inline_data(mut self, mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        self.inline_data = Some(InlineData {
            mime_type: mime_type.into(),
            data: data.into(),
        });
        self
    }
}

/// Backend for text generation (LLM): prompt plus optional image in, text out.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Run one generation. Returns the concatenated text, possibly empty.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Whether the backend's credential is present.
    fn is_configured(&self) -> bool;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// Capability that transcribes an image or PDF into text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Transcribe a base64-encoded payload of the given MIME type.
    async fn extract_text(&self, data_base64: &str, mime_type: &str) -> Result<String>;
}
