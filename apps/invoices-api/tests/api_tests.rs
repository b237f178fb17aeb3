//! End-to-end tests: the full router over an in-memory SQLite database.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use invoices_api::{router, AppState};
use invoices_db::{Database, DbConfig};

// =============================================================================
// Helpers
// =============================================================================

async fn app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    router(AppState::new(db))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let raw = body.map(|json| json.to_string());
    send_raw(app, method, uri, raw).await
}

async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(text) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(text))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

fn ann() -> Value {
    json!({
        "clientId": "C1",
        "clientName": "Ann",
        "totalBeforeTaxes": 100.0,
        "taxes": 12.0,
        "totalAfterTaxes": 112.0
    })
}

fn assert_error(body: &Value, status: u16, error: &str, path: &str) {
    assert_eq!(body["status"], status);
    assert_eq!(body["error"], error);
    assert_eq!(body["path"], path);
    assert!(body["timestamp"].is_string());
    assert!(body["message"].is_string());
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "up");
    assert_eq!(body["migrations_applied"], body["migrations_total"]);
}

// =============================================================================
// Invoices
// =============================================================================

#[tokio::test]
async fn test_create_and_get_invoice() {
    let app = app().await;

    let (status, created) = send(&app, Method::POST, "/invoices", Some(ann())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert!(created["createdAt"].is_string());

    let (status, fetched) = send(&app, Method::GET, "/invoices/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["clientName"], "Ann");
    assert_eq!(fetched["totalAfterTaxes"], 112.0);
    assert_eq!(fetched["invoiceDetailIds"], json!([]));

    let (status, all) = send(&app, Method::GET, "/invoices", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_inconsistent_totals_rejected() {
    let app = app().await;
    let mut invoice = ann();
    invoice["totalAfterTaxes"] = json!(200.0);

    let (status, body) = send(&app, Method::POST, "/invoices", Some(invoice)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, 400, "Bad Request", "/invoices");
    assert!(body["message"].as_str().unwrap().contains("does not match"));

    let (_, all) = send(&app, Method::GET, "/invoices", None).await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn test_negative_id_is_bad_request() {
    let app = app().await;

    for uri in ["/invoices/-5", "/invoices/products/-5", "/invoices/details/0"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_error(&body, 400, "Bad Request", uri);
    }

    let (status, _) = send(&app, Method::DELETE, "/invoices/-5", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_with_non_positive_id_is_bad_request() {
    let app = app().await;

    for id in [-3, 0] {
        let mut invoice = ann();
        invoice["id"] = json!(id);

        let (status, body) = send(&app, Method::POST, "/invoices", Some(invoice)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error(&body, 400, "Bad Request", "/invoices");
        assert_eq!(body["message"], "Invoice id must be a positive number");
    }

    let (_, all) = send(&app, Method::GET, "/invoices", None).await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/invoices/abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, 400, "Bad Request", "/invoices/abc");
    assert_eq!(body["message"], "parameter 'id' must be of type i64");
}

#[tokio::test]
async fn test_unknown_invoice_is_not_found() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/invoices/99", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, 404, "Not Found", "/invoices/99");
    assert_eq!(body["message"], "Invoice with id 99 not found");
}

#[tokio::test]
async fn test_delete_invoice() {
    let app = app().await;
    send(&app, Method::POST, "/invoices", Some(ann())).await;

    let (status, body) = send(&app, Method::DELETE, "/invoices/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::GET, "/invoices/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::DELETE, "/invoices/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, 404, "Not Found", "/invoices/1");
}

#[tokio::test]
async fn test_put_replaces_under_path_id() {
    let app = app().await;
    send(&app, Method::POST, "/invoices", Some(ann())).await;

    let mut body = ann();
    body["id"] = json!(77);
    body["clientName"] = json!("Anne");

    let (status, replaced) = send(&app, Method::PUT, "/invoices/1", Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["id"], 1);
    assert_eq!(replaced["clientName"], "Anne");

    let (status, _) = send(&app, Method::PUT, "/invoices/5", Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, all) = send(&app, Method::GET, "/invoices", None).await;
    assert_eq!(all.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app().await;
    let (status, body) = send_raw(
        &app,
        Method::POST,
        "/invoices",
        Some("{\"clientId\": ".to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, 400, "Bad Request", "/invoices");
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_product_routes_win_over_invoice_id() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/invoices/products", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_blank_product_name_is_bad_request() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/invoices/products",
        Some(json!({ "name": "", "price": 10.0 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, 400, "Bad Request", "/invoices/products");
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn test_non_positive_price_is_bad_request() {
    let app = app().await;

    for price in [0.0, -3.0] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/invoices/products",
            Some(json!({ "name": "Widget", "price": price })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Bad Request");
    }
}

#[tokio::test]
async fn test_short_product_name_lists_field_errors() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/invoices/products",
        Some(json!({ "name": "W", "price": 10.0 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, 400, "Validation Failed", "/invoices/products");
    assert_eq!(body["errors"][0]["field"], "name");
    assert_eq!(body["errors"][0]["rejectedValue"], "W");
    assert!(body["errors"][0]["message"].is_string());
}

#[tokio::test]
async fn test_product_update_and_delete() {
    let app = app().await;
    let (status, created) = send(
        &app,
        Method::POST,
        "/invoices/products",
        Some(json!({ "name": "Widget", "price": 10.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/invoices/products/1",
        Some(json!({ "name": "Widget XL", "price": 12.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Widget XL");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let (status, _) = send(&app, Method::DELETE, "/invoices/products/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/invoices/products/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Invoice Details
// =============================================================================

async fn seed_owners(app: &Router) {
    let (status, _) = send(
        app,
        Method::POST,
        "/invoices/products",
        Some(json!({ "name": "Widget", "price": 10.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(app, Method::POST, "/invoices", Some(ann())).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_detail_embeds_owners() {
    let app = app().await;
    seed_owners(&app).await;

    let (status, line) = send(
        &app,
        Method::POST,
        "/invoices/details",
        Some(json!({ "totalprice": 30.0, "product": { "id": 1 }, "invoice": { "id": 1 } })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(line["id"], 1);
    assert_eq!(line["product"]["name"], "Widget");
    assert_eq!(line["invoice"]["clientId"], "C1");

    let (_, product) = send(&app, Method::GET, "/invoices/products/1", None).await;
    assert_eq!(product["invoiceDetailIds"], json!([1]));

    let (_, invoice) = send(&app, Method::GET, "/invoices/1", None).await;
    assert_eq!(invoice["invoiceDetailIds"], json!([1]));
}

#[tokio::test]
async fn test_detail_without_invoice_is_bad_request() {
    let app = app().await;
    seed_owners(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/invoices/details",
        Some(json!({ "totalprice": 30.0, "product": { "id": 1 } })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, 400, "Bad Request", "/invoices/details");

    let (_, all) = send(&app, Method::GET, "/invoices/details", None).await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn test_detail_with_non_positive_reference_is_bad_request() {
    let app = app().await;
    seed_owners(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/invoices/details",
        Some(json!({ "totalprice": 30.0, "product": { "id": 1 }, "invoice": { "id": 0 } })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, 400, "Bad Request", "/invoices/details");
    assert_eq!(body["message"], "Invoice id must be a positive number");

    let (_, all) = send(&app, Method::GET, "/invoices/details", None).await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn test_deleting_invoice_keeps_its_lines() {
    let app = app().await;
    seed_owners(&app).await;
    send(
        &app,
        Method::POST,
        "/invoices/details",
        Some(json!({ "totalprice": 30.0, "product": { "id": 1 }, "invoice": { "id": 1 } })),
    )
    .await;

    let (status, _) = send(&app, Method::DELETE, "/invoices/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, line) = send(&app, Method::GET, "/invoices/details/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(line["invoice"], Value::Null);
    assert_eq!(line["product"]["id"], 1);
}

#[tokio::test]
async fn test_detail_update_and_delete() {
    let app = app().await;
    seed_owners(&app).await;
    send(
        &app,
        Method::POST,
        "/invoices/details",
        Some(json!({ "totalprice": 30.0, "product": { "id": 1 }, "invoice": { "id": 1 } })),
    )
    .await;

    let (status, line) = send(
        &app,
        Method::PUT,
        "/invoices/details/1",
        Some(json!({ "totalprice": 45.0, "product": { "id": 1 }, "invoice": { "id": 1 } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(line["totalprice"], 45.0);

    let (status, _) = send(&app, Method::DELETE, "/invoices/details/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::DELETE, "/invoices/details/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, 404, "Not Found", "/invoices/details/1");
}
