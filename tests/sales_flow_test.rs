mod common;

use std::str::FromStr;

use axum::http::StatusCode;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use common::{body_json, seed_product, TestApp};

/// Money travels as a JSON string; scale may vary by backend, so compare as
/// decimals rather than text.
fn money(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("expected a string amount")).expect("bad amount")
}

#[tokio::test]
async fn recording_a_sale_snapshots_prices_and_totals() {
    let app = TestApp::spawn().await;
    let product_id = seed_product(&app, "El Aleph", "libro", "15.50").await;

    let response = app
        .post_json(
            "/api/ventas",
            json!({
                "clienteNombre": "Ana",
                "items": [{ "productoId": product_id, "cantidad": 2 }]
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let sale = body_json(response).await;
    assert_eq!(sale["clienteNombre"], "Ana");
    assert_eq!(money(&sale["total"]), dec!(31.00));
    assert_eq!(sale["items"].as_array().unwrap().len(), 1);
    assert_eq!(sale["items"][0]["productoId"], product_id);
    assert_eq!(sale["items"][0]["cantidad"], 2);
    assert_eq!(money(&sale["items"][0]["precioUnitario"]), dec!(15.50));
    assert_eq!(sale["items"][0]["titulo"], "El Aleph");
}

#[tokio::test]
async fn sale_with_unknown_product_persists_nothing() {
    let app = TestApp::spawn().await;
    let product_id = seed_product(&app, "Dune", "libro", "20.00").await;

    let response = app
        .post_json(
            "/api/ventas",
            json!({
                "clienteNombre": "Ana",
                "items": [
                    { "productoId": product_id, "cantidad": 1 },
                    { "productoId": 9999, "cantidad": 1 }
                ]
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The valid first item must not have been persisted either.
    let listing = app.get("/api/ventas").await;
    let sales = body_json(listing).await;
    assert_eq!(sales.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn sale_with_inactive_product_is_rejected_atomically() {
    let app = TestApp::spawn().await;
    let good = seed_product(&app, "Dune", "libro", "20.00").await;
    let inactive = seed_product(&app, "Alien", "pelicula", "9.99").await;

    let cookie = app.login().await;
    let response = app
        .request(
            axum::http::Request::builder()
                .method("DELETE")
                .uri(format!("/api/productos/{}", inactive))
                .header(axum::http::header::COOKIE, &cookie)
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .post_json(
            "/api/ventas",
            json!({
                "clienteNombre": "Ana",
                "items": [
                    { "productoId": good, "cantidad": 1 },
                    { "productoId": inactive, "cantidad": 1 }
                ]
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let sales = body_json(app.get("/api/ventas").await).await;
    assert_eq!(sales.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn historical_line_items_survive_catalog_changes() {
    let app = TestApp::spawn().await;
    let product_id = seed_product(&app, "Dune", "libro", "20.00").await;

    let response = app
        .post_json(
            "/api/ventas",
            json!({
                "clienteNombre": "Ana",
                "items": [{ "productoId": product_id, "cantidad": 3 }]
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let sale = body_json(response).await;
    let sale_id = sale["id"].as_i64().unwrap();

    // Re-price and deactivate the product after the sale.
    let cookie = app.login().await;
    let response = app
        .authed_json(
            "PUT",
            &format!("/api/productos/{}", product_id),
            &cookie,
            json!({
                "titulo": "Dune",
                "tipo": "libro",
                "precio": "99.00",
                "estado": false
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let fetched = body_json(app.get(&format!("/api/ventas/{}", sale_id)).await).await;
    assert_eq!(money(&fetched["total"]), dec!(60.00));
    assert_eq!(money(&fetched["items"][0]["precioUnitario"]), dec!(20.00));
}

#[tokio::test]
async fn validation_failures_return_400() {
    let app = TestApp::spawn().await;
    let product_id = seed_product(&app, "Dune", "libro", "20.00").await;

    for body in [
        json!({ "clienteNombre": "", "items": [{ "productoId": product_id, "cantidad": 1 }] }),
        json!({ "clienteNombre": "Ana", "items": [] }),
        json!({ "clienteNombre": "Ana", "items": [{ "productoId": product_id, "cantidad": 0 }] }),
    ] {
        let response = app.post_json("/api/ventas", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn missing_sale_returns_404() {
    let app = TestApp::spawn().await;
    let response = app.get("/api/ventas/42").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sales_list_newest_first_with_items() {
    let app = TestApp::spawn().await;
    let first = seed_product(&app, "Dune", "libro", "10.00").await;
    let second = seed_product(&app, "Alien", "pelicula", "5.00").await;

    for (product, qty) in [(first, 1), (second, 2)] {
        let response = app
            .post_json(
                "/api/ventas",
                json!({
                    "clienteNombre": "Ana",
                    "items": [{ "productoId": product, "cantidad": qty }]
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let sales = body_json(app.get("/api/ventas").await).await;
    let sales = sales.as_array().unwrap();
    assert_eq!(sales.len(), 2);
    for sale in sales {
        assert!(!sale["items"].as_array().unwrap().is_empty());
    }
}
