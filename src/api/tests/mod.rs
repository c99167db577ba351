use super::*;
use crate::config::UploadPolicy;
use crate::pipeline::test_helpers::{Script, ScriptedGenerator, test_config};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;


const BOUNDARY: &str = "quizgen-test-boundary";

/// One part of a hand-built multipart body
struct Part<'a> {
    name: &'a str,
    filename: Option<&'a str>,
    content_type: Option<&'a str>,
    body: &'a [u8],
}

impl<'a> Part<'a> {
    fn pdf(filename: &'a str) -> Self {
        Self {
            name: "file",
            filename: Some(filename),
            content_type: Some("application/pdf"),
            body: b"%PDF-1.4 lecture notes",
        }
    }
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match part.filename {
            Some(filename) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.name, filename
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name),
        };
        body.extend_from_slice(disposition.as_bytes());
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.body);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Pipeline backed by a scripted generator, plus its router
async fn create_test_app(scripts: Vec<Script>) -> (Router, Arc<QuizPipeline>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), UploadPolicy::Reject);
    create_test_app_with_config(config, scripts, dir).await
}

async fn create_test_app_with_config(
    config: Config,
    scripts: Vec<Script>,
    dir: TempDir,
) -> (Router, Arc<QuizPipeline>, TempDir) {
    let generator = Arc::new(ScriptedGenerator::new(config.storage.output_path(), scripts));
    let pipeline = Arc::new(QuizPipeline::with_generator(config, generator).await.unwrap());
    (create_router(pipeline.clone()), pipeline, dir)
}

#[tokio::test]
async fn server_serves_until_shutdown() {
    let (_router, pipeline, _dir) = create_test_app(vec![]).await;
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(serve(listener, pipeline, async {
        let _ = stop_rx.await;
    }));

    stop_tx.send(()).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn cors_headers_present_when_enabled() {
    let (app, _pipeline, _dir) = create_test_app(vec![]).await;

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

#[tokio::test]
async fn cors_restricted_to_configured_origins() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path(), UploadPolicy::Reject);
    config.server.api.cors_origins = vec!["http://quiz.example".to_string()];
    let (app, _pipeline, _dir) = create_test_app_with_config(config, vec![], dir).await;

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://quiz.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://quiz.example"
    );
}

#[tokio::test]
async fn api_key_guards_every_route() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path(), UploadPolicy::Reject);
    config.server.api.api_key = Some("quiz-key".to_string());
    let (app, _pipeline, _dir) = create_test_app_with_config(config, vec![], dir).await;

    let response = app.clone().oneshot(get_request("/questions")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.clone().oneshot(upload_request(&[Part::pdf("notes.pdf")])).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/health")
        .header("X-Api-Key", "quiz-key")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn swagger_ui_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path(), UploadPolicy::Reject);
    config.server.api.swagger_ui = false;
    let (app, _pipeline, _dir) = create_test_app_with_config(config, vec![], dir).await;

    let response = app.oneshot(get_request("/swagger-ui/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
