//! Solver client against a mocked Gemini REST API.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use solveai_core::{Confidence, Error, FolderInfo};
use solveai_inference::gemini::{GeminiBackend, GeminiConfig};
use solveai_inference::SolverClient;

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn solver_for(server: &MockServer, api_key: Option<&str>) -> SolverClient {
    let mut config = GeminiConfig::default().with_base_url(server.uri());
    config.api_key = api_key.map(String::from);
    SolverClient::new(Arc::new(GeminiBackend::new(config).unwrap()))
}

fn candidate_text(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_unconfigured_makes_no_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_text("{}")))
        .expect(0)
        .mount(&server)
        .await;

    let solver = solver_for(&server, None);
    assert!(!solver.is_configured());

    let err = solver
        .solve_question("Calcule F", &[], None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)));

    let err = solver
        .extract_text_from_image("AAAA", "image/jpeg")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[tokio::test]
async fn test_solve_success() {
    let server = MockServer::start().await;
    let answer = json!({
        "originalQuestion": "Calcule a força para m=2kg, a=3m/s²",
        "extractedData": ["m = 2 kg", "a = 3 m/s²"],
        "steps": [{"title": "Interpretação", "content": "F = m·a"}],
        "finalAnswer": "F = 6 N",
        "usedMaterials": ["slide3.png"],
        "shortVersion": "F = 6 N",
        "confidence": "alta",
        "sourceCitations": [{"formula": "F = ma", "source": "Slide 3"}]
    });

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": {"responseMimeType": "application/json"}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(candidate_text(&answer.to_string())),
        )
        .expect(1)
        .mount(&server)
        .await;

    let solver = solver_for(&server, Some("test-key"));
    let info = FolderInfo {
        name: "Física I".to_string(),
        book_reference: Some("Halliday".to_string()),
        notes: None,
    };
    let response = solver
        .solve_question(
            "Calcule a força para m=2kg, a=3m/s²",
            &["[slide3.png]\nF=ma".to_string()],
            Some(&info),
        )
        .await
        .unwrap();

    assert_eq!(response.final_answer, "F = 6 N");
    assert_eq!(response.confidence, Confidence::Alta);
    assert_eq!(response.extracted_data.len(), 2);
    assert_eq!(response.source_citations[0].source, "Slide 3");
    assert!(response.question_items.is_empty());
    assert!(response.warnings.is_empty());
    assert!(response.missing_data.is_empty());
    assert_eq!(response.confidence_reason, "");
}

#[tokio::test]
async fn test_prompt_carries_materials_and_folder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_text("{}")))
        .mount(&server)
        .await;

    let solver = solver_for(&server, Some("test-key"));
    let info = FolderInfo {
        name: "Física I".to_string(),
        book_reference: None,
        notes: Some("g = 10".to_string()),
    };
    solver
        .solve_question("q", &["[slide3.png]\nF=ma".to_string()], Some(&info))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("[slide3.png]\nF=ma"));
    assert!(prompt.contains("[INFORMAÇÕES DA MATÉRIA: Física I]"));
    assert!(prompt.contains("INFORMAÇÕES ADICIONAIS DO PROFESSOR/ALUNO: g = 10"));
}

#[tokio::test]
async fn test_empty_candidates_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let solver = solver_for(&server, Some("test-key"));
    let err = solver.solve_question("q", &[], None).await.unwrap_err();
    assert!(matches!(err, Error::EmptyResponse(_)));
}

#[tokio::test]
async fn test_non_json_text_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(candidate_text("Claro! Aqui está a resolução: F = 6 N")),
        )
        .mount(&server)
        .await;

    let solver = solver_for(&server, Some("test-key"));
    let err = solver.solve_question("q", &[], None).await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
    assert!(!err.to_string().contains("Aqui está"));
}

#[tokio::test]
async fn test_upstream_error_is_inference_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": {"code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let solver = solver_for(&server, Some("test-key"));
    let err = solver.solve_question("q", &[], None).await.unwrap_err();
    assert!(matches!(err, Error::Inference(_)));
    assert!(err.to_string().contains("HTTP 503"));
    assert!(!err.to_string().contains("overloaded"));
}

#[tokio::test]
async fn test_rejected_key_is_inference_error_without_upstream_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "code": 403,
                "message": "Permission denied: Consumer 'api_key:AIza-secret' has been suspended.",
                "status": "PERMISSION_DENIED"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let solver = solver_for(&server, Some("test-key"));
    let err = solver.solve_question("q", &[], None).await.unwrap_err();
    assert!(!matches!(err, Error::Config(_)));
    assert!(matches!(err, Error::Inference(_)));
    let message = err.to_string();
    assert!(message.contains("HTTP 403"));
    assert!(!message.contains("AIza-secret"));
    assert!(!message.contains("suspended"));
}

#[tokio::test]
async fn test_extract_text_sends_inline_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "contents": [{
                "role": "user",
                "parts": [{"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo"}}]
            }]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(candidate_text("1) Um bloco de 2 kg... a) Calcule F")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let solver = solver_for(&server, Some("test-key"));
    let text = solver
        .extract_text_from_image("iVBORw0KGgo", "image/png")
        .await
        .unwrap();
    assert_eq!(text, "1) Um bloco de 2 kg... a) Calcule F");
}

#[tokio::test]
async fn test_extract_text_empty_is_ok() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let solver = solver_for(&server, Some("test-key"));
    let text = solver
        .extract_text_from_image("AAAA", "image/jpeg")
        .await
        .unwrap();
    assert_eq!(text, "");
}
