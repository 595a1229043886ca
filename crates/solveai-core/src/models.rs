//! Core data models for SolveAI.
//!
//! Two families live here: the persisted catalog records (folders and their
//! files) and the transient solve contract exchanged with the model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// CATALOG TYPES
// =============================================================================

/// A named collection of reference material used to ground solutions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Partial update for a folder's metadata.
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderPatch {
    #[serde(default)]
    pub book_reference: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl FolderPatch {
    pub fn is_empty(&self) -> bool {
        self.book_reference.is_none() && self.notes.is_none()
    }

    /// Merge this patch into a folder record.
    pub fn apply(self, folder: &mut Folder) {
        if let Some(book_reference) = self.book_reference {
            folder.book_reference = Some(book_reference);
        }
        if let Some(notes) = self.notes {
            folder.notes = Some(notes);
        }
    }
}

/// Folder listing entry with its file count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderSummary {
    #[serde(flatten)]
    pub folder: Folder,
    pub file_count: i64,
}

/// A reference file owned by a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextFile {
    pub id: Uuid,
    pub folder_id: Uuid,
    pub name: String,
    /// MIME type as reported at upload.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Size of the original file in bytes.
    pub size: i64,
    /// Inline payload as a `data:` URL.
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ContextFile {
    /// Whether the model can transcribe this file's payload.
    pub fn is_extractable(&self) -> bool {
        crate::content_type::is_extractable(&self.mime_type)
    }

    /// The cached transcription, if one exists and is not blank.
    pub fn cached_text(&self) -> Option<&str> {
        self.extracted_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// A file to add to a folder; id and timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContextFile {
    pub folder_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: i64,
    pub data: String,
    #[serde(default)]
    pub extracted_text: Option<String>,
}

// =============================================================================
// SOLVE CONTRACT
// =============================================================================

/// Folder metadata forwarded to the prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&Folder> for FolderInfo {
    /// Blank metadata is treated as unset.
    fn from(folder: &Folder) -> Self {
        let non_blank = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
        Self {
            name: folder.name.clone(),
            book_reference: non_blank(&folder.book_reference),
            notes: non_blank(&folder.notes),
        }
    }
}

/// Input to a solve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolveRequest {
    pub question_text: String,
    pub context_materials: Vec<String>,
    pub folder_info: Option<FolderInfo>,
}

/// Self-reported certainty of the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Alta,
    #[default]
    Media,
    Baixa,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Alta => "alta",
            Confidence::Media => "media",
            Confidence::Baixa => "baixa",
        }
    }

    /// Parse a model-supplied level, tolerating case and the accented "média".
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "alta" | "high" => Some(Confidence::Alta),
            "media" | "média" | "medium" => Some(Confidence::Media),
            "baixa" | "low" => Some(Confidence::Baixa),
            _ => None,
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A titled markdown block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionStep {
    pub title: String,
    pub content: String,
}

/// Result for one lettered item of the question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionItem {
    pub letter: String,
    pub description: String,
    pub solution: String,
    pub formulas: Vec<String>,
    pub concepts: Vec<String>,
    pub detailed_calculation: String,
    pub final_result: String,
    pub solution_steps: Vec<SolutionStep>,
}

/// Formula with the material (or "general knowledge") it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCitation {
    pub formula: String,
    pub source: String,
}

/// Normalized solver output.
///
/// Every field is always present; absent upstream values become empty
/// strings, empty arrays, or `Confidence::Media`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveResponse {
    pub original_question: String,
    pub extracted_data: Vec<String>,
    pub question_items: Vec<QuestionItem>,
    pub steps: Vec<SolutionStep>,
    pub final_answer: String,
    pub used_materials: Vec<String>,
    pub short_version: String,
    pub confidence: Confidence,
    pub confidence_reason: String,
    pub warnings: Vec<String>,
    pub missing_data: Vec<String>,
    pub source_citations: Vec<SourceCitation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder() -> Folder {
        Folder {
            id: Uuid::nil(),
            name: "Física I".to_string(),
            book_reference: Some("Halliday Vol. 1".to_string()),
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_patch_keeps_unspecified_fields() {
        let mut f = folder();
        FolderPatch {
            book_reference: None,
            notes: Some("Prova na sexta".to_string()),
        }
        .apply(&mut f);

        assert_eq!(f.book_reference.as_deref(), Some("Halliday Vol. 1"));
        assert_eq!(f.notes.as_deref(), Some("Prova na sexta"));
    }

    #[test]
    fn test_empty_patch() {
        assert!(FolderPatch::default().is_empty());
    }

    #[test]
    fn test_folder_info_drops_blank_metadata() {
        let mut f = folder();
        f.notes = Some("   ".to_string());
        let info = FolderInfo::from(&f);
        assert_eq!(info.name, "Física I");
        assert_eq!(info.book_reference.as_deref(), Some("Halliday Vol. 1"));
        assert!(info.notes.is_none());
    }

    #[test]
    fn test_folder_serializes_camel_case_without_unset_fields() {
        let json = serde_json::to_value(folder()).unwrap();
        assert_eq!(json["bookReference"], "Halliday Vol. 1");
        assert!(json.get("notes").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_context_file_type_field_name() {
        let file = ContextFile {
            id: Uuid::nil(),
            folder_id: Uuid::nil(),
            name: "slide3.png".to_string(),
            mime_type: "image/png".to_string(),
            size: 10,
            data: "data:image/png;base64,AAAA".to_string(),
            extracted_text: Some("  ".to_string()),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["type"], "image/png");
        assert_eq!(json["folderId"], Uuid::nil().to_string());
        assert!(file.is_extractable());
        assert!(file.cached_text().is_none());
    }

    #[test]
    fn test_confidence_parse() {
        assert_eq!(Confidence::parse("alta"), Some(Confidence::Alta));
        assert_eq!(Confidence::parse(" Média "), Some(Confidence::Media));
        assert_eq!(Confidence::parse("BAIXA"), Some(Confidence::Baixa));
        assert_eq!(Confidence::parse("alta | media | baixa"), None);
        assert_eq!(Confidence::default(), Confidence::Media);
    }

    #[test]
    fn test_solve_response_default_has_every_field() {
        let json = serde_json::to_value(SolveResponse::default()).unwrap();
        for key in [
            "originalQuestion",
            "extractedData",
            "questionItems",
            "steps",
            "finalAnswer",
            "usedMaterials",
            "shortVersion",
            "confidence",
            "confidenceReason",
            "warnings",
            "missingData",
            "sourceCitations",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["confidence"], "media");
    }
}
