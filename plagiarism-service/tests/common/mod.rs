#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use plagiarism_service::config::{CompletionConfig, PlagiarismConfig, UploadConfig};
use plagiarism_service::services::providers::mock::MockCompletionProvider;
use plagiarism_service::startup::{build_router, AppState, Application};
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub const BOUNDARY: &str = "plagiarism-test-boundary";

pub fn test_config(base_url: &str) -> PlagiarismConfig {
    let mut completion = CompletionConfig::with_api_key("sk-test");
    completion.base_url = base_url.to_string();
    completion.timeout_secs = 5;

    PlagiarismConfig {
        common: CoreConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
        },
        completion,
        upload: UploadConfig::default(),
    }
}

/// Router wired to a scripted provider; returns the provider for inspection.
pub fn router_with(provider: MockCompletionProvider) -> (Router, Arc<MockCompletionProvider>) {
    router_with_config(test_config("http://unused.invalid"), provider)
}

pub fn router_with_config(
    config: PlagiarismConfig,
    provider: MockCompletionProvider,
) -> (Router, Arc<MockCompletionProvider>) {
    let provider = Arc::new(provider);
    let router = build_router(AppState::new(config, provider.clone()));
    (router, provider)
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        field: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

pub fn multipart_request(parts: &[Part<'_>]) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                field,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        field, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/check")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the real application (OpenAI provider) against `config`.
    pub async fn spawn(config: PlagiarismConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();

        // Wait for the server to answer health checks
        for _ in 0..50 {
            if client
                .get(format!("{}/health", address))
                .send()
                .await
                .is_ok()
            {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }

        Self { address, client }
    }

    pub async fn check_text(&self, text: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/check", self.address))
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
