//! 接口层集成测试
//!
//! 用确定性假客户端替换外部能力，路由通过 `tower::ServiceExt::oneshot`
//! 直接驱动，不发起任何真实网络调用。

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use futures::future::BoxFuture;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use quiz_exam_server::api::{create_router, AppState};
use quiz_exam_server::clients::{ExtractError, GenerateError, TextExtractor, TextGenerator};
use quiz_exam_server::config::Config;
use quiz_exam_server::services::{ExplainService, GenerateService, IngestService};
use quiz_exam_server::store::{QuestionBank, SeedBank};

/// 确定性假生成器
struct FakeGenerator {
    reply: Result<String, String>,
}

impl FakeGenerator {
    fn succeeding(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
        }
    }

    fn failing() -> Self {
        Self {
            reply: Err("connection refused".to_string()),
        }
    }
}

impl TextGenerator for FakeGenerator {
    fn is_configured(&self) -> bool {
        true
    }

    fn complete<'a>(
        &'a self,
        _system_prompt: &'a str,
        _user_prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, GenerateError>> {
        Box::pin(async move {
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(GenerateError::Api(message.clone())),
            }
        })
    }
}

/// 确定性假提取器
struct FakeExtractor {
    text: Option<String>,
}

impl TextExtractor for FakeExtractor {
    fn extract_text(&self, _data: &[u8]) -> Result<String, ExtractError> {
        self.text.clone().ok_or(ExtractError::EmptyText)
    }
}

/// 组装测试用路由：种子题库 + 注入的假能力
fn test_router(generator: FakeGenerator, extractor: FakeExtractor) -> Router {
    let generator: Arc<dyn TextGenerator> = Arc::new(generator);
    let generate = GenerateService::new(Arc::clone(&generator));

    let state = AppState {
        bank: Arc::new(QuestionBank::Seed(SeedBank::builtin())),
        explain: Arc::new(ExplainService::new(generator)),
        ingest: Arc::new(IngestService::new(
            Arc::new(extractor),
            generate,
            &Config::default(),
        )),
    };

    create_router(state)
}

fn default_router() -> Router {
    test_router(
        FakeGenerator::failing(),
        FakeExtractor { text: None },
    )
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("构造请求失败")
}

fn multipart_request(filename: &str, bytes: &[u8]) -> Request<Body> {
    let boundary = "test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n",
            boundary, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload-exam")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .expect("构造请求失败")
}

async fn json_body(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("读取响应体失败")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("响应不是合法 JSON")
}

#[tokio::test]
async fn test_get_question_returns_a_question() {
    let app = default_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/get-question")
                .body(Body::empty())
                .expect("构造请求失败"),
        )
        .await
        .expect("请求失败");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["id"].as_u64().is_some());
    assert!(body["question"].as_str().is_some());
}

#[tokio::test]
async fn test_get_question_honors_type_filter() {
    let app = default_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/get-question?question_types=fill_blank")
                .body(Body::empty())
                .expect("构造请求失败"),
        )
        .await
        .expect("请求失败");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["type"], "fill_blank");
}

#[tokio::test]
async fn test_get_question_rejects_unknown_type() {
    let app = default_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/get-question?question_types=essay")
                .body(Body::empty())
                .expect("构造请求失败"),
        )
        .await
        .expect("请求失败");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_check_answer_fill_blank_is_whitespace_insensitive() {
    // 内置题库第 1 题：The capital of Vietnam is ___. → Hanoi
    let app = default_router();

    let response = app
        .oneshot(json_request(
            "/check-answer",
            json!({ "question_id": 1, "answer": " Hanoi " }),
        ))
        .await
        .expect("请求失败");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["correct"], true);
    assert_eq!(body["correct_answer"], "Hanoi");
}

#[tokio::test]
async fn test_check_answer_multiple_choice_is_case_sensitive() {
    // 内置题库第 5 题：选择题，答案 Hanoi
    let app = default_router();

    let response = app
        .oneshot(json_request(
            "/check-answer",
            json!({ "question_id": 5, "answer": "hanoi" }),
        ))
        .await
        .expect("请求失败");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["correct"], false);
}

#[tokio::test]
async fn test_check_answer_unknown_question_is_404() {
    let app = default_router();

    let response = app
        .oneshot(json_request(
            "/check-answer",
            json!({ "question_id": 9999, "answer": "Hanoi" }),
        ))
        .await
        .expect("请求失败");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert!(body["detail"].as_str().is_some());
}

#[tokio::test]
async fn test_generate_exam_rejects_non_positive_count() {
    let app = default_router();

    let response = app
        .oneshot(json_request(
            "/generate-exam",
            json!({ "num_questions": 0 }),
        ))
        .await
        .expect("请求失败");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_exam_caps_at_pool_size() {
    let app = default_router();

    let response = app
        .oneshot(json_request(
            "/generate-exam",
            json!({ "num_questions": 100 }),
        ))
        .await
        .expect("请求失败");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let questions = body.as_array().expect("应返回题目数组");
    assert_eq!(questions.len(), 12);
}

#[tokio::test]
async fn test_get_explanation_degrades_to_placeholder_on_fault() {
    // 生成器故障时返回占位文本，不返回错误体
    let app = default_router();

    let response = app
        .oneshot(json_request(
            "/get-explanation",
            json!({ "question_id": 1, "answer": "Hanoi" }),
        ))
        .await
        .expect("请求失败");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["explanation"], "暂无解析");
}

#[tokio::test]
async fn test_get_explanation_returns_generated_text() {
    let app = test_router(
        FakeGenerator::succeeding("因为河内是越南的首都"),
        FakeExtractor { text: None },
    );

    let response = app
        .oneshot(json_request(
            "/get-explanation",
            json!({ "question_id": 1, "answer": "Hanoi" }),
        ))
        .await
        .expect("请求失败");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["explanation"], "因为河内是越南的首都");
}

#[tokio::test]
async fn test_upload_rejects_non_pdf_filename() {
    let app = default_router();

    let response = app
        .oneshot(multipart_request("notes.txt", b"hello"))
        .await
        .expect("请求失败");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_pdf_ingests_multiple_choice_questions() {
    let payload = r#"[
        {"type": "multiple_choice", "question": "What is discussed in the document?",
         "options": ["History", "Geography", "Math", "Music"], "answer": "History"}
    ]"#;
    let app = test_router(
        FakeGenerator::succeeding(payload),
        FakeExtractor {
            text: Some("document text".to_string()),
        },
    );

    let response = app
        .clone()
        .oneshot(multipart_request("lesson.pdf", b"%PDF-fake"))
        .await
        .expect("请求失败");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let questions = body.as_array().expect("应返回题目数组");
    assert_eq!(questions.len(), 1);
    // 内置题库有 12 题，入库的新题接着分配 ID
    assert_eq!(questions[0]["id"], 13);
    assert_eq!(questions[0]["type"], "multiple_choice");

    // 入库的题目立即可判题
    let response = app
        .oneshot(json_request(
            "/check-answer",
            json!({ "question_id": 13, "answer": "History" }),
        ))
        .await
        .expect("请求失败");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["correct"], true);
}

#[tokio::test]
async fn test_upload_with_empty_extraction_is_400() {
    let app = test_router(
        FakeGenerator::succeeding("[]"),
        FakeExtractor { text: None },
    );

    let response = app
        .oneshot(multipart_request("lesson.pdf", b"%PDF-fake"))
        .await
        .expect("请求失败");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
