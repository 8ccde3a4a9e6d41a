#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot`

use repair_status_portal::build_router;
use repair_status_portal::clients::{
    EmailSender, ImageStore, InMemoryImageStore, InMemoryTabularStore, LogEmailSender,
};
use repair_status_portal::config::EnvironmentConfig;
use repair_status_portal::state::AppState;

pub const AUTH_TAB: &str = "allvehiclesmonday";

/// Hoja con el caso de Jane Doe, un vehículo entregado y un lead
pub async fn shop_store() -> Arc<InMemoryTabularStore> {
    let store = InMemoryTabularStore::new()
        .with_tab(
            AUTH_TAB,
            &[
                &["RO", "Monday_Item_ID", "UPDATES", "GROUP"],
                &["4355", "91234", "Paint in Progress", ""],
                &["4356", "55555", "Ready for Pickup", "delivered"],
                &["4357", "77777", "Estimate", "leads"],
                &["4360", "60000", "Body Work", ""],
            ],
        )
        .await
        .with_tab(
            "customer-info",
            &[
                &["RO", "CUSTOMER", "INSURANCE", "CLAIM", "VEHICLE", "VIN", "Customer Phone", "EMAIL"],
                &[
                    "4355",
                    "Jane Doe",
                    "GEICO",
                    "CLM-1",
                    "2019 Honda Civic",
                    "1HGCM82633A004352",
                    "(555) 010-0100",
                    "jane@example.com",
                ],
            ],
        )
        .await
        .with_tab(
            "updatelist",
            &[
                &["STATUS", "PORTAL"],
                &["Paint in Progress", "Your vehicle is in the paint booth."],
                &["Ready for Pickup", "Come and get it!"],
            ],
        )
        .await;
    Arc::new(store)
}

pub fn app_with(
    config: EnvironmentConfig,
    store: Arc<InMemoryTabularStore>,
    images: Arc<dyn ImageStore>,
    email: Arc<dyn EmailSender>,
) -> Router {
    build_router(AppState::new(config, store, images, email, None))
}

pub async fn default_app() -> (Router, Arc<InMemoryTabularStore>, Arc<InMemoryImageStore>) {
    let store = shop_store().await;
    let images = Arc::new(InMemoryImageStore::new());
    let app = app_with(
        EnvironmentConfig::demo(),
        store.clone(),
        images.clone(),
        Arc::new(LogEmailSender),
    );
    (app, store, images)
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn extract_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
