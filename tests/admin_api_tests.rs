//! Tests de integración del panel del taller

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{body::Body, http::Request, http::StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;

use common::*;
use repair_status_portal::clients::{
    ImageStore, InMemoryImageStore, InMemoryTabularStore, LogEmailSender, TabularStore,
};
use repair_status_portal::config::EnvironmentConfig;
use repair_status_portal::utils::errors::{AppError, AppResult};

const SESSION: (&str, &str) = ("x-admin-session", "true");
const BOUNDARY: &str = "----portal-test-boundary";

fn multipart_request(ro_number: &str, mime_type: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"roNumber\"\r\n\r\n{ro}\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"photo\"\r\n\
             Content-Type: {mime}\r\n\r\n",
            b = BOUNDARY,
            ro = ro_number,
            mime = mime_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/admin/upload-photo")
        .header(SESSION.0, SESSION.1)
        .header("content-type", format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_admin_login() {
    let (app, _, _) = default_app().await;
    let ok = send(
        &app,
        json_request("POST", "/api/admin/auth", json!({"username": "admin", "password": "demo-admin"})),
    )
    .await;
    assert_eq!(ok.status(), StatusCode::OK);

    let bad = send(
        &app,
        json_request("POST", "/api/admin/auth", json!({"username": "admin", "password": "guess"})),
    )
    .await;
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_vehicles_require_session() {
    let (app, _, _) = default_app().await;
    let response = send(&app, empty_request("GET", "/api/admin/vehicles", &[])).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_vehicles_list_active_sorted() {
    let (app, _, _) = default_app().await;
    let response = send(&app, empty_request("GET", "/api/admin/vehicles", &[SESSION])).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["data"]["count"], 2);
    let ros: Vec<&str> = body["data"]["vehicles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["roNumber"].as_str().unwrap())
        .collect();
    assert_eq!(ros, vec!["4360", "4355"]);
    assert_eq!(body["data"]["vehicles"][1]["clientName"], "Jane Doe");
}

#[tokio::test]
async fn test_upload_photo_then_vehicle_shows_it() {
    let (app, _, images) = default_app().await;
    let response = send(&app, multipart_request("4355", "image/png", &[137, 80, 78, 71])).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    let photo_url = body["data"]["photoUrl"].as_str().unwrap().to_string();
    assert!(photo_url.ends_with("repair-portal/vehicles/RO-4355.png"));
    assert!(images.contains("repair-portal/vehicles/RO-4355").await);

    let vehicle = send(&app, empty_request("GET", "/api/vehicle/4355?password=91234", &[])).await;
    let vehicle = extract_json(vehicle).await;
    assert_eq!(vehicle["data"]["photoUrl"], photo_url.as_str());
    assert_eq!(vehicle["data"]["photoTimestamp"], body["data"]["photoDate"]);
}

#[tokio::test]
async fn test_upload_photo_rejections() {
    let (app, _, images) = default_app().await;

    let gif = send(&app, multipart_request("4355", "image/gif", b"GIF89a")).await;
    assert_eq!(gif.status(), StatusCode::BAD_REQUEST);

    let unknown = send(&app, multipart_request("0000", "image/jpeg", &[1, 2, 3])).await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let mut no_session = multipart_request("4355", "image/jpeg", &[1, 2, 3]);
    no_session.headers_mut().remove(SESSION.0);
    assert_eq!(send(&app, no_session).await.status(), StatusCode::UNAUTHORIZED);

    assert!(images.is_empty().await);
}

/// Almacén que falla al borrar ciertos public_id
struct FailingImageStore {
    inner: InMemoryImageStore,
    failing: HashSet<String>,
}

#[async_trait]
impl ImageStore for FailingImageStore {
    async fn upload(&self, bytes: Vec<u8>, mime_type: &str, folder: &str, key: &str) -> AppResult<String> {
        self.inner.upload(bytes, mime_type, folder, key).await
    }

    async fn delete(&self, public_id: &str) -> AppResult<()> {
        if self.failing.contains(public_id) {
            return Err(AppError::ExternalApi("image host unavailable".to_string()));
        }
        self.inner.delete(public_id).await
    }
}

async fn cleanup_app(cron_secret: Option<&str>) -> (axum::Router, Arc<InMemoryTabularStore>) {
    let old = (Utc::now() - Duration::days(10)).to_rfc3339();
    let recent = (Utc::now() - Duration::days(2)).to_rfc3339();
    let urls: Vec<String> = (1..=5)
        .map(|ro| format!("https://res.cloudinary.com/shop/image/upload/v1700000000/repair-portal/vehicles/RO-{}.jpg", ro))
        .collect();
    let (old, recent) = (old.as_str(), recent.as_str());

    let store = InMemoryTabularStore::new()
        .with_tab(
            AUTH_TAB,
            &[
                &["RO", "Monday_Item_ID", "UPDATES", "GROUP", "PHOTO_URL", "PHOTO_DATE"],
                &["1", "a", "Ready", "delivered", urls[0].as_str(), old],
                &["2", "b", "Ready", "delivered", urls[1].as_str(), old],
                &["3", "c", "Ready", "delivered", urls[2].as_str(), old],
                &["4", "d", "Ready", "delivered", urls[3].as_str(), recent],
                &["5", "e", "Paint", "", urls[4].as_str(), old],
            ],
        )
        .await
        .with_tab("customer-info", &[&["RO", "CUSTOMER"]])
        .await
        .with_tab("updatelist", &[&["STATUS", "PORTAL"]])
        .await;
    let store = Arc::new(store);

    let images = FailingImageStore {
        inner: InMemoryImageStore::new(),
        failing: HashSet::from(["repair-portal/vehicles/RO-2".to_string()]),
    };

    let mut config = EnvironmentConfig::demo();
    config.cron_secret = cron_secret.map(str::to_string);
    let app = app_with(config, store.clone(), Arc::new(images), Arc::new(LogEmailSender));
    (app, store)
}

#[tokio::test]
async fn test_cleanup_preview_lists_stale_delivered_photos() {
    let (app, _) = cleanup_app(None).await;
    let response = send(&app, empty_request("GET", "/api/admin/cleanup-photos?days=7", &[SESSION])).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["data"]["daysOld"], 7);
    assert_eq!(body["data"]["count"], 3);

    let response = send(&app, empty_request("GET", "/api/admin/cleanup-photos?days=30", &[SESSION])).await;
    assert_eq!(extract_json(response).await["data"]["count"], 0);
}

#[tokio::test]
async fn test_cleanup_rejects_invalid_days() {
    let (app, _) = cleanup_app(None).await;
    for query in ["days=0", "days=-3", "days=abc", "days=36501", "days=100000000"] {
        let uri = format!("/api/admin/cleanup-photos?{}", query);
        for method in ["GET", "DELETE"] {
            let response = send(&app, empty_request(method, &uri, &[SESSION])).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{} {}", method, query);
            assert_eq!(
                extract_json(response).await["message"],
                "Invalid days parameter. Must be a positive number."
            );
        }
    }
}

#[tokio::test]
async fn test_cleanup_with_nothing_stale() {
    let (app, store) = cleanup_app(None).await;
    let before = store.read_tab(AUTH_TAB).await.unwrap();

    let response = send(&app, empty_request("DELETE", "/api/admin/cleanup-photos?days=30", &[SESSION])).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["message"], "No old photos to clean up");
    assert_eq!(body["data"]["deleted"], 0);
    assert_eq!(body["data"]["failed"], 0);
    assert_eq!(store.read_tab(AUTH_TAB).await.unwrap(), before);
}

#[tokio::test]
async fn test_cleanup_authorization() {
    let (app, _) = cleanup_app(Some("cron-s3cret")).await;

    let anonymous = send(&app, empty_request("DELETE", "/api/admin/cleanup-photos", &[])).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let wrong = send(
        &app,
        empty_request("DELETE", "/api/admin/cleanup-photos", &[("x-cron-secret", "nope")]),
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    // El secreto del cron no sirve para la vista previa
    let preview = send(
        &app,
        empty_request("GET", "/api/admin/cleanup-photos", &[("x-cron-secret", "cron-s3cret")]),
    )
    .await;
    assert_eq!(preview.status(), StatusCode::UNAUTHORIZED);

    let cron = send(
        &app,
        empty_request("DELETE", "/api/admin/cleanup-photos", &[("x-cron-secret", "cron-s3cret")]),
    )
    .await;
    assert_eq!(cron.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cleanup_reports_partial_failures() {
    let (app, store) = cleanup_app(None).await;
    let response = send(&app, empty_request("DELETE", "/api/admin/cleanup-photos?days=7", &[SESSION])).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["data"]["deleted"], 2);
    assert_eq!(body["data"]["failed"], 1);
    let failed = body["data"]["vehicles"]
        .as_array()
        .unwrap()
        .iter()
        .find(|v| v["status"] == "failed")
        .unwrap();
    assert_eq!(failed["roNumber"], "2");
    assert!(failed["error"].as_str().unwrap().contains("image host unavailable"));

    let rows = store.read_tab(AUTH_TAB).await.unwrap();
    assert_eq!(rows[1][4], "");
    assert_eq!(rows[1][5], "");
    // El borrado falló: la hoja conserva la foto para reintentar
    assert!(rows[2][4].ends_with("RO-2.jpg"));
    assert_eq!(rows[3][4], "");
    // Entregado hace poco y activo: intactos
    assert!(rows[4][4].ends_with("RO-4.jpg"));
    assert!(rows[5][4].ends_with("RO-5.jpg"));

    // Segunda pasada: solo queda el que falló
    let again = send(&app, empty_request("GET", "/api/admin/cleanup-photos?days=7", &[SESSION])).await;
    assert_eq!(extract_json(again).await["data"]["count"], 1);
}
