//! Ad hoc uploads attached to a single solve.
//!
//! Intake items are never persisted. Each accepted upload is transcribed as
//! soon as it arrives and its text is appended to the question; removing an
//! item afterwards only drops it from the list.

use base64::Engine;
use tracing::{debug, warn};
use uuid::Uuid;

use solveai_core::{
    detect_content_type, encode_data_url, is_extractable, new_v7, sanitize_filename, Error,
    Result, TextExtractor,
};

/// Separator between the typed question and transcribed uploads.
const QUESTION_SEPARATOR: &str = "\n\n";

/// One accepted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeItem {
    pub id: Uuid,
    pub name: String,
    /// Sniffed MIME type.
    pub mime_type: String,
    pub size: usize,
    /// `data:` URL for image thumbnails.
    pub preview: Option<String>,
    pub extracted_text: Option<String>,
}

/// Question text plus the uploads collected for it.
#[derive(Debug, Clone, Default)]
pub struct IntakeSession {
    question_text: String,
    items: Vec<IntakeItem>,
}

impl IntakeSession {
    pub fn new(question_text: impl Into<String>) -> Self {
        Self {
            question_text: question_text.into(),
            items: Vec::new(),
        }
    }

    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    pub fn items(&self) -> &[IntakeItem] {
        &self.items
    }

    /// Accept an upload and transcribe it.
    ///
    /// Returns `Ok(None)` when the content is neither an image nor a PDF. A
    /// failed transcription keeps the item without text. Invalid base64 is an
    /// input error.
    pub async fn add(
        &mut self,
        name: &str,
        claimed_mime: Option<&str>,
        data_base64: &str,
        extractor: &dyn TextExtractor,
    ) -> Result<Option<Uuid>> {
        let name = sanitize_filename(name);
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(data_base64.trim().as_bytes())
            .map_err(|_| Error::InvalidInput(format!("Anexo '{}' não está em base64 válido", name)))?;

        let mime_type = detect_content_type(&name, &bytes, claimed_mime.unwrap_or_default());
        if !is_extractable(&mime_type) {
            debug!(
                subsystem = "api",
                component = "intake",
                name = %name,
                mime_type = %mime_type,
                "Skipping unsupported upload"
            );
            return Ok(None);
        }

        let extracted_text = match extractor.extract_text(data_base64.trim(), &mime_type).await {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => None,
            Err(e) => {
                warn!(
                    subsystem = "api",
                    component = "intake",
                    name = %name,
                    error = %e,
                    "Transcription failed, keeping upload without text"
                );
                None
            }
        };

        if let Some(ref text) = extracted_text {
            self.append_to_question(text);
        }

        let preview = mime_type
            .starts_with("image/")
            .then(|| encode_data_url(&mime_type, &bytes));

        let id = new_v7();
        self.items.push(IntakeItem {
            id,
            name,
            mime_type,
            size: bytes.len(),
            preview,
            extracted_text,
        });
        Ok(Some(id))
    }

    /// Drop an item. Text already merged into the question stays.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Consume the session, returning the composed question.
    pub fn into_question(self) -> String {
        self.question_text
    }

    fn append_to_question(&mut self, text: &str) {
        if self.question_text.trim().is_empty() {
            self.question_text = text.to_string();
        } else {
            self.question_text.push_str(QUESTION_SEPARATOR);
            self.question_text.push_str(text);
        }
    }
}
