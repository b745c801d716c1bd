#![allow(dead_code)]

use std::{path::PathBuf, time::Duration};

use arxiv_relay::{app_state::AppState, build_router, config::AppConfig};
use axum::{
    body::{to_bytes, Bytes},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{any, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const FAKE_PDF: &[u8] = b"%PDF-1.4\n% fake report\n%%EOF";

pub fn fixture() -> Value {
    json!({
        "query": "self-driving cars",
        "papers": [{
            "title": "End-to-end driving",
            "authors": ["A. Author", "B. Author"],
            "published": "2024-03-01",
            "category": "cs.RO",
            "url": "http://arxiv.org/abs/2403.00001",
            "summary": {
                "tldr": "Drives.",
                "key_contributions": ["c1"],
                "methods": [],
                "results": ["r1", "r2"],
                "why_it_matters": "Safety.",
                "citation": "Author et al. 2024"
            }
        }],
        "pdf_filename": "self_driving_cars.pdf",
        "extra": {"nested": [1, 2.5, null, true, "x"]}
    })
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Value> {
    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "content_type": headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        "body": serde_json::from_slice::<Value>(&body).unwrap_or(Value::Null),
    }))
}

/// `/search` responde con tantos papers como `max_results`.
async fn search(Json(req): Json<Value>) -> impl IntoResponse {
    let query = req["query"].as_str().unwrap_or_default().to_string();
    if query.trim().len() < 3 {
        return (StatusCode::BAD_REQUEST, Json(json!({"detail": "Query too short"})));
    }
    let n = req["max_results"].as_u64().unwrap_or(3);
    let papers: Vec<Value> = (1..=n)
        .map(|i| {
            json!({
                "title": format!("{query} #{i}"),
                "authors": ["Ada Lovelace"],
                "published": "2024-01-01",
                "category": "cs.AI",
                "url": format!("http://arxiv.org/abs/{i}"),
                "summary": {"tldr": "short"}
            })
        })
        .collect();
    let pdf = req["generate_pdf"].as_bool().unwrap_or(false).then(|| "report_42.pdf");
    (
        StatusCode::OK,
        Json(json!({"query": query, "papers": papers, "pdf_filename": pdf})),
    )
}

/// Backend falso en un puerto efímero. Devuelve su URL base.
pub async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/search", post(search))
        .route("/fixture", get(|| async { Json(fixture()) }))
        .route(
            "/download_pdf",
            get(|| async { ([(header::CONTENT_TYPE, "application/octet-stream")], FAKE_PDF) }),
        )
        .route(
            "/fail",
            any(|| async { (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"detail": "bad input"}))) }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({"late": true}))
            }),
        )
        .route("/not-json", get(|| async { "plain text" }))
        .route("/empty", any(|| async { StatusCode::NO_CONTENT }))
        .fallback(echo);
    serve(app).await
}

pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("arxiv-relay-test-{}", uuid::Uuid::new_v4()))
}

pub fn config(backend_url: &str) -> AppConfig {
    AppConfig {
        backend_url: backend_url.to_string(),
        frontend_dir: temp_dir(),
        upstream_timeout: Duration::from_secs(10),
        ..AppConfig::default()
    }
}

pub fn relay(config: AppConfig) -> Router {
    build_router(AppState::new(config).unwrap())
}

pub async fn body_bytes(response: axum::response::Response) -> Bytes {
    to_bytes(response.into_body(), 1024 * 1024).await.unwrap()
}

pub async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
