//! Solver client: prompt in, normalized [`SolveResponse`] out.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use solveai_core::defaults::SOLVE_TEMPERATURE;
use solveai_core::{
    Confidence, Error, FolderInfo, GenerationBackend, GenerationRequest, QuestionItem, Result,
    SolutionStep, SolveRequest, SolveResponse, SourceCitation, TextExtractor,
};

use crate::gemini::GeminiBackend;
use crate::prompt::build_prompt;

/// Error message when the credential is absent.
pub const MISSING_KEY_MESSAGE: &str =
    "GEMINI_API_KEY não está configurada. Configure a chave da API nas variáveis de ambiente.";

/// Instruction sent with every image/PDF transcription.
pub const EXTRACT_INSTRUCTION: &str = "Extraia TODO o texto visível nesta imagem. Se for uma questão de prova ou exercício, transcreva o enunciado completo, incluindo todos os itens (a, b, c, etc.), valores numéricos, fórmulas e condições. Mantenha a formatação original o máximo possível.";

/// Error message when the model returns no text.
pub const EMPTY_RESPONSE_MESSAGE: &str = "Resposta vazia do modelo";

/// Error message when the model text is not the JSON contract.
pub const MALFORMED_RESPONSE_MESSAGE: &str = "A resposta do modelo não é um JSON válido";

/// Calls the generation capability for solves and transcriptions.
///
/// Every call is one independent request: no caching, batching or retry.
#[derive(Clone)]
pub struct SolverClient {
    backend: Arc<dyn GenerationBackend>,
}

impl SolverClient {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Solver over a Gemini backend configured from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Arc::new(GeminiBackend::from_env()?)))
    }

    /// Whether the capability's credential is present.
    pub fn is_configured(&self) -> bool {
        self.backend.is_configured()
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.backend.is_configured() {
            Ok(())
        } else {
            Err(Error::Config(MISSING_KEY_MESSAGE.to_string()))
        }
    }

    /// Solve an assembled request.
    pub async fn solve(&self, request: &SolveRequest) -> Result<SolveResponse> {
        self.solve_question(
            &request.question_text,
            &request.context_materials,
            request.folder_info.as_ref(),
        )
        .await
    }

    /// Render the prompt, call the model in JSON mode and normalize its answer.
    pub async fn solve_question(
        &self,
        question_text: &str,
        context_materials: &[String],
        folder_info: Option<&FolderInfo>,
    ) -> Result<SolveResponse> {
        self.ensure_configured()?;
        if question_text.trim().is_empty() {
            return Err(Error::InvalidInput("Question text is required".to_string()));
        }

        let start = Instant::now();
        let prompt = build_prompt(question_text, context_materials, folder_info);
        debug!(
            subsystem = "inference",
            component = "solver",
            op = "solve",
            prompt_len = prompt.len(),
            material_count = context_materials.len(),
            has_folder = folder_info.is_some(),
            "Rendered solve prompt"
        );

        let request = GenerationRequest::json(prompt).with_temperature(SOLVE_TEMPERATURE);
        let raw = self.backend.generate(&request).await?;

        if raw.trim().is_empty() {
            warn!(
                subsystem = "inference",
                component = "solver",
                op = "solve",
                "Model returned an empty response"
            );
            return Err(Error::EmptyResponse(EMPTY_RESPONSE_MESSAGE.to_string()));
        }

        let response = parse_solve_response(&raw)?;

        info!(
            subsystem = "inference",
            component = "solver",
            op = "solve",
            response_len = raw.len(),
            items = response.question_items.len(),
            confidence = %response.confidence,
            duration_ms = start.elapsed().as_millis() as u64,
            "Solve complete"
        );
        Ok(response)
    }

    /// Transcribe all visible text of an image or PDF.
    ///
    /// Returns an empty string when the model finds nothing.
    pub async fn extract_text_from_image(&self, data_base64: &str, mime_type: &str) -> Result<String> {
        self.ensure_configured()?;
        if data_base64.trim().is_empty() {
            return Err(Error::InvalidInput("Image data is required".to_string()));
        }

        let start = Instant::now();
        let request =
            GenerationRequest::text(EXTRACT_INSTRUCTION).with_inline_data(mime_type, data_base64);
        let text = self.backend.generate(&request).await?;

        debug!(
            subsystem = "inference",
            component = "solver",
            op = "extract_text",
            mime_type = %mime_type,
            response_len = text.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Extraction complete"
        );
        Ok(text)
    }
}

#[async_trait]
impl TextExtractor for SolverClient {
    async fn extract_text(&self, data_base64: &str, mime_type: &str) -> Result<String> {
        self.extract_text_from_image(data_base64, mime_type).await
    }
}

/// Parse model text into the contract. Anything but a JSON object is
/// rejected; the raw text is logged, never returned.
pub fn parse_solve_response(raw: &str) -> Result<SolveResponse> {
    match serde_json::from_str::<Value>(raw.trim()) {
        Ok(value) if value.is_object() => Ok(normalize_response(&value)),
        Ok(_) | Err(_) => {
            warn!(
                subsystem = "inference",
                component = "solver",
                op = "parse",
                response_len = raw.len(),
                raw = %raw,
                "Model response is not a JSON object"
            );
            Err(Error::MalformedResponse(
                MALFORMED_RESPONSE_MESSAGE.to_string(),
            ))
        }
    }
}

/// Fill every contract field from a parsed object, defaulting absent or
/// ill-typed members to empty strings, empty lists and `media`.
pub fn normalize_response(value: &Value) -> SolveResponse {
    let empty = Map::new();
    let obj = value.as_object().unwrap_or(&empty);

    SolveResponse {
        original_question: string_field(obj, "originalQuestion"),
        extracted_data: string_list(obj, "extractedData"),
        question_items: object_list(obj, "questionItems", question_item),
        steps: object_list(obj, "steps", solution_step),
        final_answer: string_field(obj, "finalAnswer"),
        used_materials: string_list(obj, "usedMaterials"),
        short_version: string_field(obj, "shortVersion"),
        confidence: obj
            .get("confidence")
            .and_then(Value::as_str)
            .and_then(Confidence::parse)
            .unwrap_or_default(),
        confidence_reason: string_field(obj, "confidenceReason"),
        warnings: string_list(obj, "warnings"),
        missing_data: string_list(obj, "missingData"),
        source_citations: object_list(obj, "sourceCitations", source_citation),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key).and_then(scalar_string).unwrap_or_default()
}

fn string_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::Array(values)) => values.iter().filter_map(scalar_string).collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn object_list<T>(
    obj: &Map<String, Value>,
    key: &str,
    convert: fn(&Map<String, Value>) -> T,
) -> Vec<T> {
    match obj.get(key) {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_object)
            .map(convert)
            .collect(),
        _ => Vec::new(),
    }
}

fn solution_step(obj: &Map<String, Value>) -> SolutionStep {
    SolutionStep {
        title: string_field(obj, "title"),
        content: string_field(obj, "content"),
    }
}

fn question_item(obj: &Map<String, Value>) -> QuestionItem {
    QuestionItem {
        letter: string_field(obj, "letter"),
        description: string_field(obj, "description"),
        solution: string_field(obj, "solution"),
        formulas: string_list(obj, "formulas"),
        concepts: string_list(obj, "concepts"),
        detailed_calculation: string_field(obj, "detailedCalculation"),
        final_result: string_field(obj, "finalResult"),
        solution_steps: object_list(obj, "solutionSteps", solution_step),
    }
}

fn source_citation(obj: &Map<String, Value>) -> SourceCitation {
    SourceCitation {
        formula: string_field(obj, "formula"),
        source: string_field(obj, "source"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGenerationBackend;
    use crate::prompt::OUTPUT_SCHEMA_EXAMPLE;
    use serde_json::json;
    use solveai_core::ResponseFormat;

    #[test]
    fn test_normalize_empty_object_fills_defaults() {
        let response = normalize_response(&json!({}));

        assert_eq!(response, SolveResponse::default());
        assert_eq!(response.confidence, Confidence::Media);

        let value = serde_json::to_value(&response).unwrap();
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
            assert!(!value[key].is_null(), "{} must never be null", key);
        }
        assert_eq!(value["confidence"], "media");
    }

    #[test]
    fn test_normalize_partial_object() {
        let response = normalize_response(&json!({
            "originalQuestion": "Calcule F",
            "finalAnswer": "F = 6 N",
            "confidence": "alta",
            "questionItems": [{"letter": "A", "finalResult": 6}]
        }));

        assert_eq!(response.original_question, "Calcule F");
        assert_eq!(response.final_answer, "F = 6 N");
        assert_eq!(response.confidence, Confidence::Alta);
        assert!(response.extracted_data.is_empty());
        assert!(response.steps.is_empty());
        assert!(response.source_citations.is_empty());
        assert_eq!(response.question_items[0].letter, "A");
        assert_eq!(response.question_items[0].final_result, "6");
        assert!(response.question_items[0].solution_steps.is_empty());
        assert!(response.question_items[0].formulas.is_empty());
    }

    #[test]
    fn test_normalize_tolerates_ill_typed_members() {
        let response = normalize_response(&json!({
            "extractedData": "m = 2 kg",
            "warnings": [null, "ambíguo", {"x": 1}],
            "steps": ["not an object", {"title": "Interpretação"}],
            "confidence": "ALTA ou media",
            "sourceCitations": {"formula": "F = ma"}
        }));

        assert_eq!(response.extracted_data, vec!["m = 2 kg"]);
        assert_eq!(response.warnings, vec!["ambíguo"]);
        assert_eq!(response.steps.len(), 1);
        assert_eq!(response.steps[0].title, "Interpretação");
        assert_eq!(response.steps[0].content, "");
        assert_eq!(response.confidence, Confidence::Media);
        assert!(response.source_citations.is_empty());
    }

    #[test]
    fn test_schema_example_normalizes() {
        let response = parse_solve_response(OUTPUT_SCHEMA_EXAMPLE).unwrap();
        assert_eq!(response.question_items.len(), 2);
        assert_eq!(response.question_items[0].solution_steps.len(), 3);
        assert_eq!(response.steps.len(), 10);
        assert_eq!(response.source_citations[1].source, "Conhecimento geral de física");
    }

    #[test]
    fn test_parse_rejects_non_object() {
        for raw in ["não é json", "[1, 2]", "\"texto\"", "{\"finalAnswer\": "] {
            let err = parse_solve_response(raw).unwrap_err();
            assert!(matches!(err, Error::MalformedResponse(_)), "{}", raw);
            assert!(!err.to_string().contains(raw));
        }
    }

    #[tokio::test]
    async fn test_unconfigured_solve_never_calls_backend() {
        let backend = Arc::new(MockGenerationBackend::unconfigured());
        let solver = SolverClient::new(backend.clone());

        let err = solver.solve_question("Calcule F", &[], None).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("GEMINI_API_KEY"));

        let err = solver.extract_text_from_image("AAAA", "image/png").await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_solve_uses_json_mode_and_low_temperature() {
        let backend = Arc::new(
            MockGenerationBackend::new().with_solve_response(r#"{"finalAnswer": "F = 6 N"}"#),
        );
        let solver = SolverClient::new(backend.clone());

        let response = solver
            .solve_question("Calcule a força para m=2kg, a=3m/s²", &[], None)
            .await
            .unwrap();
        assert_eq!(response.final_answer, "F = 6 N");

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].response_format, ResponseFormat::Json);
        assert_eq!(calls[0].temperature, Some(SOLVE_TEMPERATURE));
        assert!(calls[0].inline_data.is_none());
        assert!(calls[0].prompt.contains("Calcule a força para m=2kg"));
    }

    #[tokio::test]
    async fn test_empty_response_is_hard_failure() {
        let backend = Arc::new(MockGenerationBackend::new().with_solve_response("   "));
        let solver = SolverClient::new(backend);

        let err = solver.solve_question("q", &[], None).await.unwrap_err();
        assert!(matches!(err, Error::EmptyResponse(_)));
    }

    #[tokio::test]
    async fn test_blank_question_rejected() {
        let backend = Arc::new(MockGenerationBackend::new());
        let solver = SolverClient::new(backend.clone());

        let err = solver.solve_question("  ", &[], None).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_model_items_returned_unchanged() {
        let backend = Arc::new(MockGenerationBackend::new().with_solve_response(
            r#"{"questionItems": [], "finalAnswer": "v = 6 m/s", "confidence": "alta"}"#,
        ));
        let solver = SolverClient::new(backend);

        let response = solver
            .solve_question(
                "Calcule a velocidade final (use a fórmula) com aceleração constante)",
                &[],
                None,
            )
            .await
            .unwrap();
        assert!(response.question_items.is_empty());
        assert!(response.warnings.is_empty());
        assert_eq!(response.final_answer, "v = 6 m/s");

        let backend = Arc::new(
            MockGenerationBackend::new().with_solve_response(r#"{"questionItems": []}"#),
        );
        let solver = SolverClient::new(backend);
        let response = solver
            .solve_question("a) Calcule F. b) Calcule W.", &[], None)
            .await
            .unwrap();
        assert!(response.question_items.is_empty());
        assert!(response.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_extract_sends_image_and_instruction() {
        let backend =
            Arc::new(MockGenerationBackend::new().with_extract_response("Questão 1: a) ..."));
        let solver = SolverClient::new(backend.clone());

        let text = solver.extract_text("iVBORw0KGgo", "image/png").await.unwrap();
        assert_eq!(text, "Questão 1: a) ...");

        let calls = backend.calls();
        assert_eq!(calls[0].response_format, ResponseFormat::Text);
        assert_eq!(calls[0].prompt, EXTRACT_INSTRUCTION);
        let inline = calls[0].inline_data.as_ref().unwrap();
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(inline.data, "iVBORw0KGgo");
    }
}
