//! Builds the grounding context for a solve from a selected folder.
//!
//! ## Per-file resolution
//!
//! 1. Cached transcription: `[name]\n<text>`
//! 2. Image or PDF: transcribe, cache the text, then `[name]\n<text>`
//! 3. Plain text upload: decode the payload, `[name]\n<text>`
//! 4. Anything else, or any failure above: `[name] - Arquivo de contexto`
//!
//! A file that fails never aborts the assembly. Storage errors while listing
//! do propagate.

use std::time::Instant;

use tracing::{debug, info, warn};
use uuid::Uuid;

use solveai_core::defaults::CONTEXT_FILE_PLACEHOLDER;
use solveai_core::{
    parse_data_url, ContextFile, FileRepository, FolderInfo, FolderRepository, Result,
    TextExtractor,
};

/// Materials and folder metadata for one solve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledContext {
    pub context_materials: Vec<String>,
    pub folder_info: Option<FolderInfo>,
}

/// Resolves a folder's files into context strings.
pub struct ContextAssembler<'a> {
    folders: &'a dyn FolderRepository,
    files: &'a dyn FileRepository,
    extractor: &'a dyn TextExtractor,
}

impl<'a> ContextAssembler<'a> {
    pub fn new(
        folders: &'a dyn FolderRepository,
        files: &'a dyn FileRepository,
        extractor: &'a dyn TextExtractor,
    ) -> Self {
        Self {
            folders,
            files,
            extractor,
        }
    }

    /// Assemble context for an optional folder.
    ///
    /// No folder, or a folder that no longer exists, yields an empty context.
    /// Materials follow file enumeration order.
    pub async fn assemble(&self, folder_id: Option<Uuid>) -> Result<AssembledContext> {
        let Some(folder_id) = folder_id else {
            return Ok(AssembledContext::default());
        };

        let Some(folder) = self.folders.get(folder_id).await? else {
            warn!(
                subsystem = "api",
                component = "assembler",
                folder_id = %folder_id,
                "Selected folder not found, solving without context"
            );
            return Ok(AssembledContext::default());
        };

        let start = Instant::now();
        let files = self.files.list_by_folder(folder_id).await?;
        let mut context_materials = Vec::with_capacity(files.len());
        for file in &files {
            context_materials.push(self.material_for(file).await);
        }

        info!(
            subsystem = "api",
            component = "assembler",
            op = "assemble",
            folder_id = %folder_id,
            material_count = context_materials.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Context assembled"
        );

        Ok(AssembledContext {
            context_materials,
            folder_info: Some(FolderInfo::from(&folder)),
        })
    }

    async fn material_for(&self, file: &ContextFile) -> String {
        if let Some(text) = file.cached_text() {
            debug!(file_id = %file.id, "Using cached transcription");
            return tagged(&file.name, text);
        }

        let text = if file.is_extractable() {
            self.extract(file).await
        } else if is_plain_text(&file.mime_type) {
            decode_text(file)
        } else {
            None
        };

        match text {
            Some(text) => tagged(&file.name, &text),
            None => placeholder(&file.name),
        }
    }

    /// Transcribe an image or PDF and cache the result.
    async fn extract(&self, file: &ContextFile) -> Option<String> {
        let payload = match parse_data_url(&file.data) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(file_id = %file.id, error = %e, "Undecodable file payload");
                return None;
            }
        };

        let text = match self.extractor.extract_text(&payload.base64, &file.mime_type).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!(file_id = %file.id, "Extraction returned no text");
                return None;
            }
            Err(e) => {
                warn!(
                    subsystem = "api",
                    component = "assembler",
                    file_id = %file.id,
                    error = %e,
                    "Extraction failed, using placeholder"
                );
                return None;
            }
        };

        if let Err(e) = self.files.set_extracted_text(file.id, &text).await {
            warn!(file_id = %file.id, error = %e, "Failed to cache transcription");
        }
        Some(text)
    }
}

fn tagged(name: &str, text: &str) -> String {
    format!("[{}]\n{}", name, text)
}

fn placeholder(name: &str) -> String {
    format!("[{}] - {}", name, CONTEXT_FILE_PLACEHOLDER)
}

fn is_plain_text(mime_type: &str) -> bool {
    mime_type.trim().to_ascii_lowercase().starts_with("text/")
}

fn decode_text(file: &ContextFile) -> Option<String> {
    let bytes = parse_data_url(&file.data).and_then(|p| p.bytes()).ok()?;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
