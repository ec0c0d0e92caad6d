use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

use dermasense::backend::{default_device, InferenceBackend};
use dermasense::contact::MemoryStore;
use dermasense::inference::BurnEngine;
use dermasense::knowledge::CLASS_LABELS;
use dermasense::model::ModelLoader;
use dermasense::notify::{NotificationGateway, SmsProvider, SmsSettings};
use dermasense_server::{build_router, AppState, ServerConfig};

const BOUNDARY: &str = "dermasense-test-boundary";

struct CountingProvider {
    account: String,
    calls: AtomicUsize,
}

#[async_trait]
impl SmsProvider for CountingProvider {
    async fn send(&self, _body: &str, _from: &str, _to: &str) -> dermasense::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("SM0001".to_string())
    }

    fn account_id(&self) -> &str {
        &self.account
    }
}

fn counting_provider(account: &str) -> Arc<CountingProvider> {
    Arc::new(CountingProvider {
        account: account.to_string(),
        calls: AtomicUsize::new(0),
    })
}

fn config(dir: &TempDir) -> ServerConfig {
    ServerConfig {
        static_dir: dir.path().join("static"),
        upload_dir: dir.path().join("uploads"),
        ..ServerConfig::default()
    }
}

fn minimal_engine() -> BurnEngine<InferenceBackend> {
    let device = default_device();
    let artifact = ModelLoader::new("missing.mpk").minimal::<InferenceBackend>(&device);
    BurnEngine::new(artifact, device)
}

fn app_with_model(dir: &TempDir) -> Router {
    let state = AppState::new(config(dir)).with_engine(Arc::new(minimal_engine()));
    build_router(Arc::new(state))
}

fn jpeg_bytes() -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(120, 90, |x, y| {
        Rgb([(x * 2) as u8, (y * 2) as u8, 140])
    }));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Jpeg).unwrap();
    buf.into_inner()
}

fn multipart_request(field: &str, filename: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let dir = tempdir().unwrap();
    let response = app_with_model(&dir)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn debug_reports_model_tier() {
    let dir = tempdir().unwrap();
    let response = app_with_model(&dir)
        .oneshot(Request::get("/debug").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["model_loaded"], json!(true));
    assert_eq!(body["model_tier"], json!("minimal"));
    assert_eq!(body["sms_available"], json!(false));
}

#[tokio::test]
async fn predict_valid_jpeg_returns_diagnosis() {
    let dir = tempdir().unwrap();
    let app = app_with_model(&dir);

    let response = app
        .clone()
        .oneshot(multipart_request("file", "lesion.jpg", &jpeg_bytes()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let disease = body["disease"].as_str().unwrap();
    assert!(CLASS_LABELS.contains(&disease));
    let confidence = body["confidence"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&confidence));
    assert!(!body["description"].as_str().unwrap().is_empty());

    let image_path = body["image_path"].as_str().unwrap().to_string();
    assert!(image_path.starts_with("/uploads/"));
    assert!(image_path.ends_with("_lesion.jpg"));

    // The stored upload is served back
    let served = app
        .oneshot(Request::get(image_path.as_str()).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(served.status(), StatusCode::OK);
}

#[tokio::test]
async fn predict_without_model_is_unavailable() {
    let dir = tempdir().unwrap();
    let app = build_router(Arc::new(AppState::new(config(&dir))));

    let response = app
        .oneshot(multipart_request("file", "lesion.jpg", &jpeg_bytes()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("not available"));
}

#[tokio::test]
async fn predict_rejects_bad_extension() {
    let dir = tempdir().unwrap();
    let response = app_with_model(&dir)
        .oneshot(multipart_request("file", "notes.txt", b"hello"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], json!("Invalid file type. Please upload an image."));
}

#[tokio::test]
async fn predict_requires_file_field() {
    let dir = tempdir().unwrap();
    let response = app_with_model(&dir)
        .oneshot(multipart_request("image", "lesion.jpg", &jpeg_bytes()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], json!("No file uploaded!"));
}

#[tokio::test]
async fn predict_undecodable_image_is_server_error() {
    let dir = tempdir().unwrap();
    let response = app_with_model(&dir)
        .oneshot(multipart_request("file", "lesion.png", b"not an image"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Prediction failed:"));
}

#[tokio::test]
async fn send_sms_short_phone_never_reaches_provider() {
    let dir = tempdir().unwrap();
    let provider = counting_provider("AC123");
    let sms = NotificationGateway::new(Some(provider.clone()), SmsSettings::default());
    let app = build_router(Arc::new(AppState::new(config(&dir)).with_sms(sms)));

    let response = app
        .oneshot(json_request(
            "/send_sms",
            json!({ "phone": "12345", "disease": "Eczema" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["status"], json!("error"));
    assert_eq!(body["message"], json!("Valid phone number is required"));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn send_sms_delivers_through_provider() {
    let dir = tempdir().unwrap();
    let provider = counting_provider("AC123");
    let sms = NotificationGateway::new(Some(provider.clone()), SmsSettings::default());
    let app = build_router(Arc::new(AppState::new(config(&dir)).with_sms(sms)));

    let response = app
        .oneshot(json_request(
            "/send_sms",
            json!({
                "phone": "9876543210",
                "disease": "Eczema",
                "description": "A condition that makes the skin red, inflamed, and itchy.",
                "treatment": "Moisturizers"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], json!("success"));
    assert_eq!(body["sid"], json!("SM0001"));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn send_sms_demo_credentials_simulate() {
    let dir = tempdir().unwrap();
    let provider = counting_provider("YOUR_ACTUAL_TWILIO_SID");
    let sms = NotificationGateway::new(Some(provider.clone()), SmsSettings::default());
    let app = build_router(Arc::new(AppState::new(config(&dir)).with_sms(sms)));

    let response = app
        .oneshot(json_request(
            "/send_sms",
            json!({ "phone": "+919876543210", "disease": "Warts" }),
        ))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["status"], json!("success"));
    assert_eq!(body["message"], json!("SMS sent successfully (Demo Mode)"));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn send_sms_blank_phone_is_not_sent_to_default_recipient() {
    let dir = tempdir().unwrap();
    let provider = counting_provider("AC123");
    let sms = NotificationGateway::new(
        Some(provider.clone()),
        SmsSettings {
            default_recipient: Some("9999999999".to_string()),
            ..SmsSettings::default()
        },
    );
    let app = build_router(Arc::new(AppState::new(config(&dir)).with_sms(sms)));

    let response = app
        .oneshot(json_request(
            "/send_sms",
            json!({ "phone": "          ", "disease": "Eczema" }),
        ))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["status"], json!("error"));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn send_sms_without_provider_reports_unavailable() {
    let dir = tempdir().unwrap();
    let app = build_router(Arc::new(AppState::new(config(&dir))));

    let response = app
        .oneshot(json_request(
            "/send_sms",
            json!({ "phone": "9876543210", "disease": "Warts" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], json!("error"));
    assert_eq!(body["message"], json!("SMS service not available"));
}

#[tokio::test]
async fn contact_without_store_is_unavailable() {
    let dir = tempdir().unwrap();
    let app = build_router(Arc::new(AppState::new(config(&dir))));

    let response = app
        .oneshot(form_request(
            "/contact",
            "name=Asha&email=asha%40example.com&message=Hello",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"], json!("Database not available"));
}

#[tokio::test]
async fn contact_missing_field_is_bad_request() {
    let dir = tempdir().unwrap();
    let state = AppState::new(config(&dir)).with_contacts(Arc::new(MemoryStore::new()));
    let app = build_router(Arc::new(state));

    let response = app
        .oneshot(form_request("/contact", "name=Asha&message=Hello"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], json!("All fields are required"));
}

#[tokio::test]
async fn contact_is_stored_and_listed() {
    let dir = tempdir().unwrap();
    let state = AppState::new(config(&dir)).with_contacts(Arc::new(MemoryStore::new()));
    let app = build_router(Arc::new(state));

    let response = app
        .clone()
        .oneshot(form_request(
            "/contact",
            "name=Asha&email=asha%40example.com&message=Hello",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["message"], json!("Message sent successfully!"));

    let response = app
        .oneshot(Request::get("/messages").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!([{ "name": "Asha", "email": "asha@example.com", "message": "Hello" }])
    );
}
